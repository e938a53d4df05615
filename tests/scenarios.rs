use termclust::{build_vector, cluster, interpret, Agglomerative, Merge, SparseVector};

#[test]
fn identical_lists_merge_in_first_round() {
    let mut vectors = vec![
        build_vector(["a", "a", "b"]),
        build_vector(["a", "a", "b"]),
        build_vector(["c"]),
        build_vector(["d"]),
    ];
    let d = Agglomerative::new().fit(&mut vectors).unwrap();

    assert_eq!(d.merges()[0], Merge { left: 0, right: 1 });
    let sims = d.similarities().unwrap();
    assert!((sims[0] - 1.0).abs() < 1e-12);
    assert!(sims[1..].iter().all(|&s| s == 0.0));
}

#[test]
fn single_vector_yields_nothing() {
    let mut vectors = vec![build_vector(["only"])];
    let merges = cluster(&mut vectors);
    assert!(merges.is_empty());
    assert!(interpret(&merges).is_empty());
}

#[test]
fn disjoint_singletons_merge_deterministically() {
    let build = || -> Vec<SparseVector> {
        (0..10).map(|i| build_vector([format!("tok{i}")])).collect()
    };

    let mut vectors = build();
    let merges = cluster(&mut vectors);

    let expected: Vec<Merge> = (1..10).map(|right| Merge { left: 0, right }).collect();
    assert_eq!(merges, expected);

    let mut again = build();
    assert_eq!(cluster(&mut again), merges);
}

#[test]
fn zero_vectors_participate() {
    let mut vectors = vec![
        SparseVector::new(),
        build_vector(["x"]),
        build_vector(Vec::<&str>::new()),
        build_vector(["x", "x"]),
    ];
    let merges = cluster(&mut vectors);
    assert_eq!(merges.len(), 3);
    assert_eq!(merges[0], Merge { left: 1, right: 3 });
}

#[test]
fn topical_groups_are_flagged() {
    // Four topics, six entities each, with a little shared vocabulary.
    let topics = ["rust", "jazz", "chess", "bread"];
    let mut vectors = Vec::new();
    let mut topic_of = Vec::new();
    for (t, topic) in topics.iter().enumerate() {
        for i in 0..6 {
            let mut tokens = vec![topic.to_string(), format!("{topic}-{}", i % 3)];
            tokens.push(format!("{topic}-core"));
            if i % 2 == 0 {
                tokens.push("common".to_string());
            }
            vectors.push(build_vector(&tokens));
            topic_of.push(t);
        }
    }

    let merges = cluster(&mut vectors);
    assert_eq!(merges.len(), 23);

    let flagged = interpret(&merges);
    assert_eq!(flagged.len(), 4);
    for group in &flagged {
        assert!(group.len() > 3 && group.len() < 23 / 2);
        let t = topic_of[group[0]];
        assert!(group.iter().all(|&i| topic_of[i] == t));
    }
}
