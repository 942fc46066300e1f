//! Collections, owned platforms, play sessions and ratings.

mod common;

use common::TestHarness;
use game_tracker_lib::database::dto::PlatformCheck;
use game_tracker_lib::error::TrackerError;

// ============================================================================
// Collection management
// ============================================================================

#[tokio::test]
async fn collections_list_counts_games_and_playtime() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let celeste = harness.game("Celeste", Some("E10+")).await;
    let hades = harness.game("Hades", Some("T")).await;

    let backlog = harness.service.create_collection(&ada, "Backlog").await.unwrap();
    let empty = harness.service.create_collection(&ada, "Abandoned").await.unwrap();
    for game in [celeste, hades] {
        harness
            .service
            .add_game_to_collection(&ada, backlog.id, game)
            .await
            .unwrap();
    }
    harness.service.log_play(&ada, celeste, 90).await.unwrap();
    harness.service.log_play(&ada, celeste, 45).await.unwrap();

    let list = harness.service.list_collections(&ada).await.unwrap();
    assert_eq!(list.len(), 2);
    // Ordered by name
    assert_eq!(list[0].collection_id, empty.id);
    assert_eq!(list[0].game_count, 0);
    assert_eq!(list[0].total_minutes, 0);
    assert_eq!(list[1].name, "Backlog");
    assert_eq!(list[1].game_count, 2);
    assert_eq!(list[1].total_minutes, 135);
}

#[tokio::test]
async fn collection_names_are_required_and_unique_per_user() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let grace = harness.user("grace").await;

    let err = harness.service.create_collection(&ada, "   ").await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter a name for the collection.");

    harness.service.create_collection(&ada, "Favorites").await.unwrap();
    let err = harness
        .service
        .create_collection(&ada, "Favorites")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "A collection with this name already exists.");

    // Another user may reuse the name
    harness.service.create_collection(&grace, "Favorites").await.unwrap();
}

#[tokio::test]
async fn rename_collection() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let a = harness.service.create_collection(&ada, "A").await.unwrap();
    harness.service.create_collection(&ada, "B").await.unwrap();

    let renamed = harness
        .service
        .rename_collection(&ada, a.id, " Retro ")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Retro");

    let err = harness
        .service
        .rename_collection(&ada, a.id, "B")
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Conflict(_)));
}

#[tokio::test]
async fn delete_collection_keeps_games() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let game = harness.game("Celeste", None).await;
    let backlog = harness.service.create_collection(&ada, "Backlog").await.unwrap();
    harness
        .service
        .add_game_to_collection(&ada, backlog.id, game)
        .await
        .unwrap();

    let deleted = harness.service.delete_collection(&ada, backlog.id).await.unwrap();
    assert_eq!(deleted.name, "Backlog");
    assert!(harness.service.list_collections(&ada).await.unwrap().is_empty());

    // The game can still be played
    harness.service.log_play(&ada, game, 10).await.unwrap();
}

#[tokio::test]
async fn other_users_collections_are_not_found() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let grace = harness.user("grace").await;
    let mine = harness.service.create_collection(&ada, "Mine").await.unwrap();

    let err = harness
        .service
        .delete_collection(&grace, mine.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Collection not found.");
    assert!(harness.service.collection_games(&grace, mine.id).await.is_err());
    assert_eq!(harness.service.list_collections(&ada).await.unwrap().len(), 1);
}

#[tokio::test]
async fn collection_games_are_ordered_by_title() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let zelda = harness.game("Zelda", Some("E")).await;
    let doom = harness.game("Doom", Some("M")).await;
    let backlog = harness.service.create_collection(&ada, "Backlog").await.unwrap();
    for game in [zelda, doom] {
        harness
            .service
            .add_game_to_collection(&ada, backlog.id, game)
            .await
            .unwrap();
    }

    let (collection, games) = harness
        .service
        .collection_games(&ada, backlog.id)
        .await
        .unwrap();
    assert_eq!(collection.name, "Backlog");
    let titles: Vec<&str> = games.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["Doom", "Zelda"]);
    assert_eq!(games[0].esrb_rating.as_deref(), Some("M"));
}

#[tokio::test]
async fn adding_a_game_twice_is_rejected() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let game = harness.game("Celeste", None).await;
    let backlog = harness.service.create_collection(&ada, "Backlog").await.unwrap();

    harness
        .service
        .add_game_to_collection(&ada, backlog.id, game)
        .await
        .unwrap();
    let err = harness
        .service
        .add_game_to_collection(&ada, backlog.id, game)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "'Celeste' is already in that collection.");
}

#[tokio::test]
async fn remove_game_from_collection() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let game = harness.game("Celeste", None).await;
    let backlog = harness.service.create_collection(&ada, "Backlog").await.unwrap();
    harness
        .service
        .add_game_to_collection(&ada, backlog.id, game)
        .await
        .unwrap();

    harness
        .service
        .remove_game_from_collection(&ada, backlog.id, game)
        .await
        .unwrap();
    let (_, games) = harness.service.collection_games(&ada, backlog.id).await.unwrap();
    assert!(games.is_empty());

    let err = harness
        .service
        .remove_game_from_collection(&ada, backlog.id, game)
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));
}

#[tokio::test]
async fn play_random_picks_from_the_collection() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let celeste = harness.game("Celeste", None).await;
    let hades = harness.game("Hades", None).await;
    harness.game("Not in collection", None).await;
    let backlog = harness.service.create_collection(&ada, "Backlog").await.unwrap();
    for game in [celeste, hades] {
        harness
            .service
            .add_game_to_collection(&ada, backlog.id, game)
            .await
            .unwrap();
    }

    let played = harness.service.play_random(&ada, backlog.id, 30).await.unwrap();
    assert!(played.id == celeste || played.id == hades);

    let history = harness.service.play_history(&ada, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].game_id, played.id);
    assert_eq!(history[0].duration, 30);
}

#[tokio::test]
async fn play_random_on_empty_collection() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let empty = harness.service.create_collection(&ada, "Empty").await.unwrap();

    // Empty collection is reported before minutes are validated
    let err = harness.service.play_random(&ada, empty.id, 0).await.unwrap_err();
    assert_eq!(err.to_string(), "The collection 'Empty' has no games in it.");
}

// ============================================================================
// Owned platforms
// ============================================================================

#[tokio::test]
async fn platform_check_uses_owned_platforms() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let switch = harness.platform("Switch").await;
    let pc = harness.platform("PC").await;
    let game = harness.game("Celeste", None).await;
    harness.release(game, switch, None, Some(19.99)).await;

    assert_eq!(
        harness.service.check_platforms(&ada, game).await.unwrap(),
        PlatformCheck::NotOwned
    );

    harness.service.add_platform(&ada, pc).await.unwrap();
    assert_eq!(
        harness.service.check_platforms(&ada, game).await.unwrap(),
        PlatformCheck::NotOwned
    );

    harness.service.add_platform(&ada, switch).await.unwrap();
    assert_eq!(
        harness.service.check_platforms(&ada, game).await.unwrap(),
        PlatformCheck::Owned
    );
}

#[tokio::test]
async fn owned_platforms_can_be_listed_and_removed() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let switch = harness.platform("Switch").await;
    harness.platform("PC").await;

    let added = harness.service.add_platform(&ada, switch).await.unwrap();
    assert_eq!(added.name, "Switch");
    let err = harness.service.add_platform(&ada, switch).await.unwrap_err();
    assert_eq!(err.to_string(), "You already own Switch.");

    assert_eq!(harness.service.list_platforms().await.unwrap().len(), 2);
    let mine = harness.service.my_platforms(&ada).await.unwrap();
    assert_eq!(mine.len(), 1);

    harness.service.remove_platform(&ada, switch).await.unwrap();
    assert!(harness.service.my_platforms(&ada).await.unwrap().is_empty());
    assert!(harness.service.remove_platform(&ada, switch).await.is_err());
    assert!(harness.service.add_platform(&ada, 999).await.is_err());
}

// ============================================================================
// Plays and ratings
// ============================================================================

#[tokio::test]
async fn play_time_must_be_positive() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let game = harness.game("Celeste", None).await;

    let err = harness.service.log_play(&ada, game, 0).await.unwrap_err();
    assert_eq!(err.to_string(), "Play time must be at least 1 minute.");
    assert!(harness.service.play_history(&ada, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn playing_unknown_game_fails() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let err = harness.service.log_play(&ada, 404, 10).await.unwrap_err();
    assert_eq!(err.to_string(), "Game not found.");
}

#[tokio::test]
async fn rating_is_upserted_and_bounded() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let game = harness.game("Celeste", None).await;

    for stars in [0, 6] {
        let err = harness.service.rate_game(&ada, game, stars).await.unwrap_err();
        assert_eq!(err.to_string(), "Rating must be between 1 and 5.");
    }

    harness.service.rate_game(&ada, game, 3).await.unwrap();
    harness.service.rate_game(&ada, game, 5).await.unwrap();

    let results = harness
        .service
        .search(&ada, &Default::default())
        .await
        .unwrap();
    assert_eq!(results.row(1).unwrap().my_rating, Some(5));
}

#[tokio::test]
async fn play_history_is_newest_first_and_limited() {
    let harness = TestHarness::new().await;
    let ada = harness.user("ada").await;
    let old = harness.game("Old", None).await;
    let new = harness.game("New", None).await;
    harness
        .play_at(ada.user_id(), old, common::days_ago(3), 20)
        .await;
    harness
        .play_at(ada.user_id(), new, common::days_ago(1), 40)
        .await;

    let history = harness.service.play_history(&ada, 1).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].title, "New");
}
