use super::support::*;

#[tokio::test]
async fn self_edges_never_exist_and_self_follow_fails() {
    let (service, users) = memory_service(&["a"]).await;
    let a = &users[0];

    assert!(!service.store().edge_exists(&a.id, &a.id).await.unwrap());
    let err = service.follow_user(a, &a.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    // Even for ids that are not registered.
    let ghost = UserId::from("ghost");
    assert!(!service.store().edge_exists(&ghost, &ghost).await.unwrap());
    let err = service.store().create_edge(&ghost, &ghost).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn double_follow_creates_one_edge() {
    let (service, users) = memory_service(&["u", "v"]).await;
    let (u, v) = (&users[0], &users[1]);

    assert!(service.follow_user(u, &v.id).await.unwrap());
    assert!(!service.follow_user(u, &v.id).await.unwrap());
    assert_eq!(service.store().edge_count().unwrap(), 1);
    assert_eq!(service.get_profile_info(&v.id).await.unwrap().followers, 1);
}

#[tokio::test]
async fn unfollow_is_idempotent() {
    let (service, users) = memory_service(&["u", "v"]).await;
    let (u, v) = (&users[0], &users[1]);

    assert!(!service.unfollow_user(u, &v.id).await.unwrap());
    service.follow_user(u, &v.id).await.unwrap();
    assert!(service.unfollow_user(u, &v.id).await.unwrap());
    assert!(!service.unfollow_user(u, &v.id).await.unwrap());
    assert_eq!(service.store().edge_count().unwrap(), 0);
}

#[tokio::test]
async fn counts_match_edge_set() {
    let names = ["a", "b", "c", "d", "e"];
    let (service, users) = memory_service(&names).await;
    let store = service.store();

    // i follows j whenever (i + j) is odd, plus a few removals.
    for (i, follower) in users.iter().enumerate() {
        for (j, followee) in users.iter().enumerate() {
            if i != j && (i + j) % 2 == 1 {
                service.follow(follower, &followee.id).await.unwrap();
            }
        }
    }
    service.unfollow(&users[0], &users[1].id).await.unwrap();
    service.unfollow(&users[3], &users[2].id).await.unwrap();

    for user in &users {
        let mut followers = 0;
        let mut followees = 0;
        for other in &users {
            if store.edge_exists(&other.id, &user.id).await.unwrap() {
                followers += 1;
            }
            if store.edge_exists(&user.id, &other.id).await.unwrap() {
                followees += 1;
            }
        }
        assert_eq!(store.count_followers(&user.id).await.unwrap(), followers);
        assert_eq!(store.count_followees(&user.id).await.unwrap(), followees);
    }
}

#[tokio::test]
async fn paging_visits_every_followee_once() {
    let names: Vec<String> = (0..23).map(|i| format!("user{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (service, users) = memory_service(&refs).await;
    let (hub, others) = users.split_first().unwrap();
    for other in others {
        service.follow(hub, &other.id).await.unwrap();
    }

    for limit in [1, 4, 5, 22, 50] {
        let collected = drain_followees(service.store(), &hub.id, limit).await;
        assert_eq!(collected, ids(others), "limit {limit}");
    }
}

#[tokio::test]
async fn invalid_pagination_fails_regardless_of_user() {
    let (service, users) = memory_service(&["a"]).await;
    let known = &users[0].id;
    let ghost = UserId::from("ghost");

    for id in [known, &ghost] {
        for (skip, limit) in [(-1, 5), (0, 0), (0, -3), (-2, -2)] {
            let err = service.list_following(id, skip, limit).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            let err = service.list_followers(id, skip, limit).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }
}

#[tokio::test]
async fn unknown_users_are_reported() {
    let (service, users) = memory_service(&["a"]).await;
    let ghost = UserId::from("ghost");

    let err = service.follow_user(&users[0], &ghost).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UserNotFound);
    assert_eq!(service.list_following(&ghost, 0, 5).await.unwrap_err().kind(), ErrorKind::UserNotFound);
    assert_eq!(service.list_followers(&ghost, 0, 5).await.unwrap_err().kind(), ErrorKind::UserNotFound);
    assert_eq!(service.get_profile_info(&ghost).await.unwrap_err().kind(), ErrorKind::UserNotFound);
}

#[tokio::test]
async fn unregistered_actor_cannot_create_edges() {
    let (service, users) = memory_service(&["bob"]).await;
    let bob = &users[0];
    let ghost = User {
        id: UserId::from("ghost"),
        username: "ghost".to_string(),
        ..bob.clone()
    };

    let err = service.follow_user(&ghost, &bob.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UserNotFound);

    let info = service.get_profile_info(&bob.id).await.unwrap();
    let listed = service.list_followers(&bob.id, 0, 5).await.unwrap();
    assert_eq!(info.followers, 0);
    assert_eq!(listed.len() as u64, info.followers);
}

#[tokio::test]
async fn far_out_pages_are_empty() {
    let (service, users) = memory_service(&["a", "b"]).await;
    service.follow(&users[0], &users[1].id).await.unwrap();

    assert!(service.list_following(&users[0].id, i64::MAX, 2).await.unwrap().is_empty());
    assert_eq!(service.list_following(&users[0].id, 2, i64::MAX).await.unwrap().len(), 0);
    assert_eq!(service.list_following(&users[0].id, 0, i64::MAX).await.unwrap().len(), 1);
}
