use std::sync::Arc;

use super::support::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_follows_create_exactly_one_edge() {
    let store = Arc::new(MemoryGraphStore::new());
    let (u, v) = (UserId::from("u"), UserId::from("v"));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let store = Arc::clone(&store);
        let (u, v) = (u.clone(), v.clone());
        handles.push(tokio::spawn(async move { store.create_edge(&u, &v).await.unwrap() }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap() {
            created += 1;
        }
    }
    assert_eq!(created, 1);
    assert_eq!(store.edge_count().unwrap(), 1);
    assert_eq!(store.count_followers(&v).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn opposite_directions_do_not_block_each_other() {
    // A single stripe forces both directions through the same lock.
    for stripes in [1, 2, 64] {
        let store = Arc::new(MemoryGraphStore::with_stripes(stripes));
        let (a, b) = (UserId::from("a"), UserId::from("b"));

        let mut handles = Vec::new();
        for round in 0..50 {
            let store = Arc::clone(&store);
            let (from, to) = if round % 2 == 0 { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) };
            handles.push(tokio::spawn(async move {
                store.create_edge(&from, &to).await.unwrap();
                store.remove_edge(&from, &to).await.unwrap();
                store.create_edge(&from, &to).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(store.edge_exists(&a, &b).await.unwrap());
        assert!(store.edge_exists(&b, &a).await.unwrap());
        assert_eq!(store.edge_count().unwrap(), 2);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_followers_are_all_counted() {
    let store = Arc::new(MemoryGraphStore::new());
    let star = UserId::from("star");

    let mut handles = Vec::new();
    for i in 0..40 {
        let store = Arc::clone(&store);
        let star = star.clone();
        handles.push(tokio::spawn(async move {
            store.create_edge(&UserId::from(format!("fan{i}")), &star).await.unwrap()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }

    assert_eq!(store.count_followers(&star).await.unwrap(), 40);
    let followers = store.list_followers(&star, Page::new(0, 100).unwrap()).await.unwrap();
    assert_eq!(followers.len(), 40);
}
