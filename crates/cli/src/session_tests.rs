use super::*;
use chess_core::{Board, GameRecord, MoveRequest, Square};

fn fast_config() -> AppConfig {
    AppConfig {
        engine_delay_ms: 20,
        tick_interval_ms: 10,
        seed: Some(1),
        ..Default::default()
    }
}

fn mv(from: &str, to: &str) -> UserCommand {
    UserCommand::Move(MoveRequest::new(
        Square::parse(from).unwrap(),
        Square::parse(to).unwrap(),
    ))
}

/// Next event matching `pred`, skipping anything else.
async fn wait_for(
    rx: &mut mpsc::UnboundedReceiver<SessionEvent>,
    pred: impl Fn(&SessionEvent) -> bool,
) -> SessionEvent {
    time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.expect("event channel closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

#[tokio::test]
async fn computer_replies_after_human_move() {
    let (mut session, mut events) = Session::new(fast_config()).unwrap();
    session.start().await;

    let resp = session.execute(mv("e2", "e4")).await.unwrap();
    assert!(matches!(resp, Response::Moved(ref o) if o.notation == "e4"));

    let event = wait_for(&mut events, |e| matches!(e, SessionEvent::ComputerMoved(_))).await;
    let SessionEvent::ComputerMoved(reply) = event else {
        unreachable!()
    };
    assert_eq!(reply.mv.mover.color, Color::Black);

    let game = session.game();
    let game = game.lock().await;
    assert_eq!(game.side_to_move(), Color::White);
    assert_eq!(game.history().len(), 1);
    assert!(!game.history()[0].black_notation.is_empty());
}

#[tokio::test]
async fn human_cannot_move_for_computer() {
    let config = AppConfig {
        engine_delay_ms: 5_000,
        ..fast_config()
    };
    let (mut session, _events) = Session::new(config).unwrap();
    session.start().await;
    session.execute(mv("e2", "e4")).await.unwrap();

    let err = session.execute(mv("e7", "e5")).await.unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::InvalidMove(_))));
    session.shutdown().await;
}

#[tokio::test]
async fn restart_cancels_pending_reply() {
    let config = AppConfig {
        engine_delay_ms: 150,
        ..fast_config()
    };
    let (mut session, mut events) = Session::new(config).unwrap();
    session.start().await;
    let token = session.game().lock().await.reply_token();

    session.execute(mv("e2", "e4")).await.unwrap();
    assert_eq!(
        session.execute(UserCommand::Restart).await.unwrap(),
        Response::Restarted
    );
    assert!(token.is_cancelled());

    time::sleep(Duration::from_millis(400)).await;
    while let Ok(event) = events.try_recv() {
        assert!(
            !matches!(event, SessionEvent::ComputerMoved(_)),
            "stale reply applied: {event:?}"
        );
    }
    let game = session.game();
    let game = game.lock().await;
    assert_eq!(game.board(), &Board::startpos());
    assert!(game.history().is_empty());
    assert_eq!(game.side_to_move(), Color::White);
}

#[tokio::test]
async fn computer_opens_when_human_plays_black() {
    let config = AppConfig {
        human: Color::Black,
        ..fast_config()
    };
    let (mut session, mut events) = Session::new(config).unwrap();
    session.start().await;

    let event = wait_for(&mut events, |e| matches!(e, SessionEvent::ComputerMoved(_))).await;
    let SessionEvent::ComputerMoved(reply) = event else {
        unreachable!()
    };
    assert_eq!(reply.mv.mover.color, Color::White);
    assert_eq!(session.game().lock().await.side_to_move(), Color::Black);
}

#[tokio::test]
async fn ticker_runs_the_clock() {
    let (mut session, _events) = Session::new(fast_config()).unwrap();
    session.start().await;
    time::sleep(Duration::from_millis(120)).await;

    let update = session.clock();
    assert_eq!(update.active, Color::White);
    assert!(update.white_seconds < 300.0);
    assert_eq!(update.black_seconds, 300.0);
}

#[tokio::test]
async fn pause_freezes_the_clock() {
    let (mut session, _events) = Session::new(fast_config()).unwrap();
    session.start().await;
    assert_eq!(
        session.execute(UserCommand::Pause).await.unwrap(),
        Response::PauseToggled(true)
    );
    let frozen = session.game().lock().await.clock().remaining(Color::White);
    time::sleep(Duration::from_millis(80)).await;
    assert_eq!(
        session.game().lock().await.clock().remaining(Color::White),
        frozen
    );
}

#[tokio::test]
async fn flag_fall_is_reported() {
    let (mut session, mut events) = Session::new(fast_config()).unwrap();
    session.start().await;
    session.game().lock().await.tick(299.99);

    let event = wait_for(&mut events, |e| matches!(e, SessionEvent::GameOver { .. })).await;
    assert_eq!(
        event,
        SessionEvent::GameOver {
            status: GameStatus::Timeout,
            winner: Some(Color::Black),
        }
    );
}

#[tokio::test]
async fn low_time_is_reported_once() {
    let (mut session, mut events) = Session::new(fast_config()).unwrap();
    session.start().await;
    session.game().lock().await.tick(275.0);

    let event = wait_for(&mut events, |e| matches!(e, SessionEvent::LowTime(_))).await;
    assert_eq!(event, SessionEvent::LowTime(Color::White));

    time::sleep(Duration::from_millis(60)).await;
    while let Ok(event) = events.try_recv() {
        assert!(!matches!(event, SessionEvent::LowTime(_)));
    }
}

#[tokio::test]
async fn time_control_change_reaches_clock_watch() {
    let (mut session, _events) = Session::new(fast_config()).unwrap();
    let mut clock = session.subscribe_clock();
    session
        .execute(UserCommand::TimeControl {
            minutes: 3,
            increment: 2,
        })
        .await
        .unwrap();
    clock.changed().await.unwrap();
    assert_eq!(clock.borrow().white_seconds, 180.0);
    assert_eq!(session.game().lock().await.clock().increment(), 2);
}

#[tokio::test]
async fn huge_time_control_saturates() {
    let (mut session, _events) = Session::new(fast_config()).unwrap();
    assert!(crate::input::parse_command("time 100000000 5").is_err());

    let resp = session
        .execute(UserCommand::TimeControl {
            minutes: 100_000_000,
            increment: 5,
        })
        .await
        .unwrap();
    let Response::TimeControlChanged(tc) = resp else {
        panic!("unexpected response {resp:?}");
    };
    assert_eq!(tc, session.game().lock().await.time_control());
    assert_eq!(tc.initial_seconds, u32::MAX);
}

#[tokio::test]
async fn save_writes_json_record() {
    let (mut session, _events) = Session::new(fast_config()).unwrap();
    let path = std::env::temp_dir().join(format!("chess_cli_save_{}.json", std::process::id()));

    let resp = session.execute(UserCommand::Save(path.clone())).await.unwrap();
    assert_eq!(resp, Response::Saved(path.clone()));

    let text = tokio::fs::read_to_string(&path).await.unwrap();
    let record: GameRecord = serde_json::from_str(&text).unwrap();
    assert_eq!(record.side_to_move, Color::White);
    assert_eq!(record.status, GameStatus::Active);
    assert!(record.history.is_empty());
    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn save_to_missing_directory_fails() {
    let (mut session, _events) = Session::new(fast_config()).unwrap();
    let err = session
        .execute(UserCommand::Save(PathBuf::from("/nonexistent/dir/game.json")))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Save { .. }));
}

#[tokio::test]
async fn session_from_fen() {
    let config = AppConfig {
        fen: Some("4k3/8/8/8/8/8/8/R3K3 w".to_string()),
        ..fast_config()
    };
    let (mut session, _events) = Session::new(config).unwrap();
    let resp = session.execute(mv("a1", "a8")).await.unwrap();
    assert!(matches!(resp, Response::Moved(ref o) if o.notation == "Ra8+"));
    session.shutdown().await;

    let bad = AppConfig {
        fen: Some("not a fen".to_string()),
        ..fast_config()
    };
    assert!(matches!(Session::new(bad), Err(ConfigError::Invalid(_))));
}
