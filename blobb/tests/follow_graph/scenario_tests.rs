use super::support::*;

/// A follows B, A follows C, B follows C, C follows A.
pub(crate) async fn run_literal_scenario<D, S>(service: &FollowGraphService<D, S>, users: &[User])
where
    D: UserDirectory,
    S: FollowGraphStore,
{
    let (a, b, c) = (&users[0], &users[1], &users[2]);
    assert!(service.follow_user(a, &b.id).await.unwrap());
    assert!(service.follow_user(a, &c.id).await.unwrap());
    assert!(service.follow_user(b, &c.id).await.unwrap());
    assert!(service.follow_user(c, &a.id).await.unwrap());

    let following = service.list_following(&a.id, 0, 5).await.unwrap();
    assert_eq!(ids(&following), vec![b.id.clone(), c.id.clone()]);
    assert_eq!(following[0].username, b.username);

    let followers = service.list_followers(&c.id, 0, 5).await.unwrap();
    assert_eq!(ids(&followers), vec![a.id.clone(), b.id.clone()]);

    let info = service.get_profile_info(&a.id).await.unwrap();
    assert_eq!(info.followers, 1);
    assert_eq!(info.follows, 2);

    let first = service.list_following(&a.id, 0, 1).await.unwrap();
    let rest = service.list_following(&a.id, 1, 5).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(rest.len(), 1);
    let mut union = ids(&first);
    union.extend(ids(&rest));
    assert_eq!(union, ids(&following));

    assert!(service.unfollow_user(a, &b.id).await.unwrap());
    assert!(!service.unfollow_user(a, &b.id).await.unwrap());
    let following = service.list_following(&a.id, 0, 5).await.unwrap();
    assert_eq!(ids(&following), vec![c.id.clone()]);

    let info = service.get_profile_info(&b.id).await.unwrap();
    assert_eq!(info.followers, 0);
    assert_eq!(info.follows, 1);
}

#[tokio::test]
async fn literal_scenario_in_memory() {
    let (service, users) = memory_service(&["a", "b", "c"]).await;
    run_literal_scenario(&service, &users).await;
}

#[tokio::test]
async fn refollow_moves_edge_to_the_end() {
    let (service, users) = memory_service(&["a", "b", "c"]).await;
    let (a, b, c) = (&users[0], &users[1], &users[2]);
    service.follow(a, &b.id).await.unwrap();
    service.follow(a, &c.id).await.unwrap();
    service.unfollow(a, &b.id).await.unwrap();
    service.follow(a, &b.id).await.unwrap();

    let following = service.find_all_followed_by(&a.id, 0, 5).await.unwrap();
    assert_eq!(ids(&following), vec![c.id.clone(), b.id.clone()]);
}

#[tokio::test]
async fn listing_a_user_with_no_edges_is_empty() {
    let (service, users) = memory_service(&["loner"]).await;
    assert!(service.list_following(&users[0].id, 0, 5).await.unwrap().is_empty());
    assert!(service.list_followers(&users[0].id, 3, 5).await.unwrap().is_empty());
    let info = service.get_profile_info(&users[0].id).await.unwrap();
    assert_eq!((info.followers, info.follows), (0, 0));
}

#[tokio::test]
async fn username_lookups_follow_registration() {
    let (service, users) = memory_service(&["carol", "caroline", "bob"]).await;
    let directory = service.directory();

    assert_eq!(directory.find_by_username("CAROL").await.unwrap(), Some(users[0].clone()));
    assert!(directory.exists_by_username("bob").await.unwrap());
    assert!(!directory.exists_by_username("dave").await.unwrap());

    let matches = directory.find_all_by_username_containing("carol").await.unwrap();
    let names: Vec<&str> = matches.iter().map(|user| user.username.as_str()).collect();
    assert_eq!(names, vec!["carol", "caroline"]);

    let err = directory.register(new_user("Bob")).await.unwrap_err();
    assert!(matches!(err, blobb::GraphError::UsernameTaken { .. }));
}
