use serial_test::serial;

use super::scenario_tests::run_literal_scenario;
use super::support::*;

#[tokio::test]
#[serial]
#[ignore = "requires a running Redis server"]
async fn literal_scenario_on_redis() {
    let conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let service = ns.service(&conn);
    let users = register_all(service.directory(), &["a", "b", "c"]).await;

    run_literal_scenario(&service, &users).await;
    ns.cleanup(&conn).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a running Redis server"]
async fn redis_follow_is_idempotent_and_rejects_self() {
    let conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let store = ns.store(&conn);
    let (u, v) = (UserId::from("u"), UserId::from("v"));

    assert!(store.create_edge(&u, &v).await.unwrap());
    assert!(!store.create_edge(&u, &v).await.unwrap());
    assert_eq!(store.count_followers(&v).await.unwrap(), 1);
    assert_eq!(store.count_followees(&u).await.unwrap(), 1);

    let err = store.create_edge(&u, &u).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(!store.edge_exists(&u, &u).await.unwrap());

    assert!(store.remove_edge(&u, &v).await.unwrap());
    assert!(!store.remove_edge(&u, &v).await.unwrap());
    assert_eq!(store.count_followers(&v).await.unwrap(), 0);

    ns.cleanup(&conn).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a running Redis server"]
async fn redis_paging_visits_every_followee_once() {
    let conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let store = ns.store(&conn);
    let hub = UserId::from("hub");
    let others: Vec<UserId> = (0..17).map(|i| UserId::from(format!("user{i}"))).collect();
    for other in &others {
        store.create_edge(&hub, other).await.unwrap();
    }

    for limit in [1, 3, 17, 40] {
        assert_eq!(drain_followees(&store, &hub, limit).await, others, "limit {limit}");
    }
    ns.cleanup(&conn).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
#[ignore = "requires a running Redis server"]
async fn redis_racing_follows_create_exactly_one_edge() {
    let conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let store = ns.store(&conn);
    let (u, v) = (UserId::from("u"), UserId::from("v"));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = store.clone();
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
    assert_eq!(store.count_followers(&v).await.unwrap(), 1);

    ns.cleanup(&conn).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a running Redis server"]
async fn redis_directory_registers_and_searches() {
    let conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let service = ns.service(&conn);
    let directory = service.directory();
    let users = register_all(directory, &["carol", "caroline", "bob"]).await;

    assert_eq!(directory.find_by_id(&users[2].id).await.unwrap(), users[2]);
    assert!(directory.exists_by_username("BOB").await.unwrap());
    assert_eq!(directory.find_by_username("caroline").await.unwrap(), Some(users[1].clone()));
    let names: Vec<String> = directory
        .find_all_by_username_containing("carol")
        .await
        .unwrap()
        .into_iter()
        .map(|user| user.username)
        .collect();
    assert_eq!(names, vec!["carol", "caroline"]);

    let err = directory.register(new_user("bob")).await.unwrap_err();
    assert!(matches!(err, blobb::GraphError::UsernameTaken { .. }));
    let err = directory.find_by_id(&UserId::from("missing")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UserNotFound);

    ns.cleanup(&conn).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a running Redis server"]
async fn redis_self_members_are_excluded_from_pages_and_counts() {
    let conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let store = ns.store(&conn);
    let hub = UserId::from("hub");
    let others: Vec<UserId> = (0..6).map(|i| UserId::from(format!("user{i}"))).collect();
    for other in &others {
        store.create_edge(&hub, other).await.unwrap();
    }
    let forward = store.key_context().follows(hub.as_str());
    let reverse = store.key_context().follows_reverse(hub.as_str());
    let mut raw = conn.clone();

    // Scores place the stray member first, between edges and last.
    for score in [0.5, 3.5, 100.0] {
        let _: i64 = blobb::redis::cmd("ZADD")
            .arg(&forward)
            .arg(score)
            .arg(hub.as_str())
            .query_async(&mut raw)
            .await
            .unwrap();

        for limit in [1, 2, 3] {
            assert_eq!(drain_followees(&store, &hub, limit).await, others, "score {score} limit {limit}");
        }
        assert_eq!(store.count_followees(&hub).await.unwrap(), others.len() as u64);
        assert!(!store.edge_exists(&hub, &hub).await.unwrap());

        let _: i64 = blobb::redis::cmd("ZREM")
            .arg(&forward)
            .arg(hub.as_str())
            .query_async(&mut raw)
            .await
            .unwrap();
    }

    let _: i64 = blobb::redis::cmd("ZADD")
        .arg(&reverse)
        .arg(1)
        .arg(hub.as_str())
        .query_async(&mut raw)
        .await
        .unwrap();
    assert_eq!(store.count_followers(&hub).await.unwrap(), 0);
    assert!(store.list_followers(&hub, Page::new(0, 5).unwrap()).await.unwrap().is_empty());

    ns.cleanup(&conn).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires a running Redis server"]
async fn redis_far_out_pages_are_empty() {
    let conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let store = ns.store(&conn);
    let (u, v) = (UserId::from("u"), UserId::from("v"));
    store.create_edge(&u, &v).await.unwrap();

    let past_end = Page::new(i64::MAX, 2).unwrap();
    assert!(store.list_followees(&u, past_end).await.unwrap().is_empty());
    let everything = Page::new(0, i64::MAX).unwrap();
    assert_eq!(store.list_followees(&u, everything).await.unwrap(), vec![v.clone()]);
    assert_eq!(store.list_followers(&v, everything).await.unwrap(), vec![u.clone()]);

    ns.cleanup(&conn).await;
}
