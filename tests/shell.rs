//! Scripted sessions through the interactive shell.

mod common;

use common::{PASSWORD, TestHarness};
use game_tracker_lib::shell::Shell;

async fn run_script(harness: TestHarness, script: String) -> TestHarness {
    let mut shell = Shell::new(harness.service, script.as_bytes());
    shell.run().await.unwrap();
    TestHarness {
        service: shell.into_service(),
    }
}

#[tokio::test]
async fn register_login_and_manage_collections() {
    let harness = TestHarness::new().await;
    let script = format!(
        "collections\n\
         register\nAda\nLovelace\nada@example.com\nada\n{PASSWORD}\n\
         login\nada\n{PASSWORD}\n\
         new-collection Backlog\n\
         new-collection\nFavorites\n\
         rename-collection 2\nAll Time Favorites\n\
         bogus-command\n\
         delete-collection 1\nn\n\
         logout\n\
         quit\n"
    );
    let harness = run_script(harness, script).await;

    let session = harness.service.login("ada", PASSWORD).await.unwrap();
    let names: Vec<String> = harness
        .service
        .list_collections(&session)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["All Time Favorites", "Backlog"]);
}

#[tokio::test]
async fn errors_do_not_end_the_session() {
    let harness = TestHarness::new().await;
    harness.user("ada").await;
    let game = harness.game("Celeste", None).await;

    let script = format!(
        "login\nada\nwrong\n\
         login\nada\n{PASSWORD}\n\
         rate 1\n\
         search\nCeleste\n\n\n\n\n\n\n\
         rate 1\n9\n\
         rate 1\n4\n\
         play 1\n25\n\
         follow 1\n\
         quit\n"
    );
    let harness = run_script(harness, script).await;

    let session = harness.service.login("ada", PASSWORD).await.unwrap();
    let history = harness.service.play_history(&session, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].game_id, game);
    assert_eq!(history[0].duration, 25);

    let stats = harness
        .service
        .search(&session, &Default::default())
        .await
        .unwrap();
    assert_eq!(stats.row(1).unwrap().my_rating, Some(4));
}

#[tokio::test]
async fn end_of_input_mid_form_exits_cleanly() {
    let harness = TestHarness::new().await;
    let harness = run_script(harness, "register\nAda\n".to_string()).await;
    assert!(harness.service.login("ada", PASSWORD).await.is_err());
}

#[tokio::test]
async fn passwords_are_kept_as_typed() {
    let harness = TestHarness::new().await;
    let script = "register\nAda\nLovelace\nada@example.com\nada\n pw \n\
                  login\nada\n pw \n\
                  quit\n"
        .to_string();
    let harness = run_script(harness, script).await;

    assert!(harness.service.login("ada", " pw ").await.is_ok());
    assert!(harness.service.login("ada", "pw").await.is_err());
}
