#[cfg(test)]
mod tests {
    use crate::api::{MockServiceApi, NewService, ServiceRecord};
    use crate::app::*;
    use crate::error::{ApiError, Result};
    use crate::events::{key_event_to_action, Action, AppEvent};
    use crate::message::Severity;
    use crate::sync::{DuplicateError, SELECT_AT_LEAST_ONE};
    use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::style::Color;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn record(name: &str, url: &str, status: &str) -> ServiceRecord {
        ServiceRecord {
            name: name.to_string(),
            url: url.to_string(),
            status: status.to_string(),
            date: "2020-09-01 10:00:00".to_string(),
        }
    }

    fn app_with(api: MockServiceApi) -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(100);
        (App::new(Arc::new(api), tx), rx)
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Input(CrosstermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Input(CrosstermEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)))
    }

    async fn type_text(app: &mut App, text: &str) -> Result<()> {
        for c in text.chars() {
            let modifiers = if c.is_uppercase() {
                KeyModifiers::SHIFT
            } else {
                KeyModifiers::NONE
            };
            app.handle_event(AppEvent::Input(CrosstermEvent::Key(KeyEvent::new(KeyCode::Char(c), modifiers))))
                .await?;
        }
        Ok(())
    }

    fn message_text(app: &App) -> Option<(String, Severity)> {
        app.messages.current().map(|m| (m.text.clone(), m.severity))
    }

    #[tokio::test]
    async fn test_app_creation() {
        let (app, _rx) = app_with(MockServiceApi::new());
        assert!(!app.should_quit);
        assert!(matches!(app.view, View::Dashboard));
        assert!(app.confirm.is_none());
        assert!(app.messages.current().is_none());
    }

    #[tokio::test]
    async fn test_tick_loads_services_into_rows() -> Result<()> {
        let mut api = MockServiceApi::new();
        api.expect_list_services().times(1).returning(|| {
            Ok(vec![
                record("kry", "https://www.kry.se", "OK"),
                record("Kry Home", "https://home.kry.se", "FAIL"),
            ])
        });
        let (mut app, mut rx) = app_with(api);

        app.handle_event(AppEvent::Tick).await?;
        let event = rx.recv().await.expect("services loaded");
        assert!(matches!(event, AppEvent::ServicesLoaded(Ok(_))));
        app.handle_event(event).await?;

        assert_eq!(app.dashboard.table.len(), 2);
        assert!(app.dashboard.last_refresh.is_some());
        assert!(app.messages.current().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_load_shows_error_and_keeps_rows() -> Result<()> {
        let (mut app, _rx) = app_with(MockServiceApi::new());
        app.dashboard.set_services(vec![record("kry", "https://www.kry.se", "OK")]);

        app.handle_event(AppEvent::ServicesLoaded(Err(ApiError::Status {
            status: 503,
            body: String::new(),
        })))
        .await?;

        let (text, severity) = message_text(&app).expect("message");
        assert!(text.starts_with("Could not load services"));
        assert!(text.contains("503"));
        assert_eq!(severity, Severity::Error);
        assert_eq!(app.dashboard.table.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_duplicate_name_is_rejected_without_request() {
        let mut api = MockServiceApi::new();
        api.expect_create_service().never();
        let (mut app, mut rx) = app_with(api);
        app.dashboard.set_services(vec![record("Foo", "https://foo.example.com", "OK")]);

        assert!(!app.submit_add("foo", "https://other.example.com"));

        let (text, severity) = message_text(&app).expect("message");
        assert_eq!(text, DuplicateError::Name.to_string());
        assert_eq!(severity, Severity::Error);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_add_duplicate_url_is_rejected_without_request() {
        let mut api = MockServiceApi::new();
        api.expect_create_service().never();
        let (mut app, mut rx) = app_with(api);
        app.dashboard.set_services(vec![record("x", "http://x", "OK")]);

        assert!(!app.submit_add("y", "HTTP://X"));

        let (text, _) = message_text(&app).expect("message");
        assert_eq!(text, DuplicateError::Url.to_string());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_form_stays_open_on_duplicate() -> Result<()> {
        let mut api = MockServiceApi::new();
        api.expect_create_service().never();
        let (mut app, _rx) = app_with(api);
        app.dashboard.set_services(vec![record("Foo", "https://foo.example.com", "OK")]);

        app.handle_event(key(KeyCode::Char('a'))).await?;
        assert!(matches!(app.view, View::AddService(_)));

        type_text(&mut app, "FOO").await?;
        app.handle_event(key(KeyCode::Tab)).await?;
        type_text(&mut app, "https://new.example.com").await?;
        app.handle_event(ctrl('s')).await?;

        match &app.view {
            View::AddService(form) => {
                assert_eq!(form.name, "FOO");
                assert_eq!(form.url, "https://new.example.com");
            }
            other => panic!("form closed: {:?}", other),
        }
        assert_eq!(message_text(&app).map(|(_, s)| s), Some(Severity::Error));
        Ok(())
    }

    #[tokio::test]
    async fn test_form_accepts_altgr_characters() -> Result<()> {
        let (mut app, _rx) = app_with(MockServiceApi::new());
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;

        app.handle_event(key(KeyCode::Char('a'))).await?;
        app.handle_event(key(KeyCode::Tab)).await?;
        type_text(&mut app, "ftp://user").await?;
        app.handle_event(AppEvent::Input(CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('@'), altgr))))
            .await?;
        type_text(&mut app, "files.kry.se/").await?;
        app.handle_event(AppEvent::Input(CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('~'), altgr))))
            .await?;

        match &app.view {
            View::AddService(form) => assert_eq!(form.url, "ftp://user@files.kry.se/~"),
            other => panic!("form closed: {:?}", other),
        }
        assert!(!app.should_quit);
        Ok(())
    }

    #[tokio::test]
    async fn test_form_validation_error_blocks_submit() -> Result<()> {
        let mut api = MockServiceApi::new();
        api.expect_create_service().never();
        let (mut app, _rx) = app_with(api);

        app.handle_event(key(KeyCode::Char('a'))).await?;
        type_text(&mut app, "kry").await?;
        app.handle_event(ctrl('s')).await?;

        match &app.view {
            View::AddService(form) => assert!(form.error().is_some()),
            other => panic!("form closed: {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_add_success_shows_reply_and_refreshes() -> Result<()> {
        let mut api = MockServiceApi::new();
        api.expect_create_service()
            .withf(|service: &NewService| service.name == "Bar" && service.url == "https://bar.example.com")
            .times(1)
            .returning(|_| Ok("Service added".to_string()));
        api.expect_list_services()
            .times(1)
            .returning(|| Ok(vec![record("Bar", "https://bar.example.com", "Unknown")]));
        let (mut app, mut rx) = app_with(api);

        app.handle_event(key(KeyCode::Char('a'))).await?;
        type_text(&mut app, "  Bar ").await?;
        app.handle_event(key(KeyCode::Enter)).await?;
        type_text(&mut app, "https://bar.example.com").await?;
        app.handle_event(ctrl('s')).await?;
        assert!(matches!(app.view, View::Dashboard));

        let added = rx.recv().await.expect("service added");
        assert!(matches!(added, AppEvent::ServiceAdded { .. }));
        app.handle_event(added).await?;
        assert_eq!(message_text(&app), Some(("Service added".to_string(), Severity::Info)));

        let loaded = rx.recv().await.expect("services loaded");
        app.handle_event(loaded).await?;
        assert_eq!(app.dashboard.table.len(), 1);
        assert_eq!(app.dashboard.table.rows()[0].record.name, "Bar");
        Ok(())
    }

    #[tokio::test]
    async fn test_add_rejected_by_server_shows_error() -> Result<()> {
        let mut api = MockServiceApi::new();
        api.expect_create_service().times(1).returning(|_| {
            Err(ApiError::Status {
                status: 409,
                body: "Already polled".to_string(),
            })
        });
        api.expect_list_services().returning(|| Ok(vec![]));
        let (mut app, mut rx) = app_with(api);

        assert!(app.submit_add("kry", "https://www.kry.se"));
        let event = rx.recv().await.expect("service added");
        app.handle_event(event).await?;

        let (text, severity) = message_text(&app).expect("message");
        assert_eq!(text, "Already polled (HTTP 409)");
        assert_eq!(severity, Severity::Error);
        assert_eq!(severity.color(), Some(Color::Red));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_with_nothing_selected_informs_user() -> Result<()> {
        let mut api = MockServiceApi::new();
        api.expect_delete_services().never();
        let (mut app, mut rx) = app_with(api);
        app.dashboard.set_services(vec![record("kry", "https://www.kry.se", "OK")]);

        app.handle_event(key(KeyCode::Char('d'))).await?;

        assert!(app.confirm.is_none());
        assert_eq!(message_text(&app), Some((SELECT_AT_LEAST_ONE.to_string(), Severity::Info)));
        assert!(rx.try_recv().is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_confirmed_sends_selected_urls() -> Result<()> {
        let mut api = MockServiceApi::new();
        api.expect_delete_services()
            .withf(|urls: &[String]| urls.len() == 1 && urls[0] == "https://www.kry.se")
            .times(1)
            .returning(|_| Ok("Deleted".to_string()));
        api.expect_list_services()
            .times(1)
            .returning(|| Ok(vec![record("livi", "https://www.livi.co.uk", "OK")]));
        let (mut app, mut rx) = app_with(api);
        app.dashboard.set_services(vec![
            record("kry", "https://www.kry.se", "OK"),
            record("livi", "https://www.livi.co.uk", "OK"),
        ]);

        app.handle_event(key(KeyCode::Char(' '))).await?;
        app.handle_event(key(KeyCode::Delete)).await?;
        let dialog = app.confirm.clone().expect("dialog open");
        assert_eq!(dialog.urls, vec!["https://www.kry.se".to_string()]);

        // Navigation keys do not dismiss the dialog
        app.handle_event(key(KeyCode::Down)).await?;
        assert!(app.confirm.is_some());

        app.handle_event(key(KeyCode::Char('y'))).await?;
        assert!(app.confirm.is_none());

        let deleted = rx.recv().await.expect("services deleted");
        app.handle_event(deleted).await?;
        let (text, severity) = message_text(&app).expect("message");
        assert_eq!(text, "Deleted");
        assert_eq!(severity.color(), Some(Color::Green));

        let loaded = rx.recv().await.expect("services loaded");
        app.handle_event(loaded).await?;
        assert_eq!(app.dashboard.table.len(), 1);
        assert_eq!(app.dashboard.table.rows()[0].record.name, "livi");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_declined_sends_nothing() -> Result<()> {
        let mut api = MockServiceApi::new();
        api.expect_delete_services().never();
        let (mut app, mut rx) = app_with(api);
        app.dashboard.set_services(vec![record("kry", "https://www.kry.se", "OK")]);

        app.handle_event(key(KeyCode::Char(' '))).await?;
        app.handle_event(key(KeyCode::Char('d'))).await?;
        assert!(app.confirm.is_some());

        app.handle_event(key(KeyCode::Char('n'))).await?;
        assert!(app.confirm.is_none());
        assert!(app.messages.current().is_none());
        assert!(rx.try_recv().is_err());
        assert_eq!(app.dashboard.table.selected_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_failure_shows_error() -> Result<()> {
        let mut api = MockServiceApi::new();
        api.expect_list_services().returning(|| Ok(vec![]));
        let (mut app, _rx) = app_with(api);

        app.handle_event(AppEvent::ServicesDeleted {
            count: 2,
            outcome: Err(ApiError::Status {
                status: 500,
                body: String::new(),
            }),
        })
        .await?;

        assert_eq!(
            message_text(&app),
            Some(("Server answered HTTP 500".to_string(), Severity::Error))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_even_with_dialog_open() -> Result<()> {
        let (mut app, _rx) = app_with(MockServiceApi::new());
        app.dashboard.set_services(vec![record("kry", "https://www.kry.se", "OK")]);

        app.handle_event(key(KeyCode::Char(' '))).await?;
        app.handle_event(key(KeyCode::Char('d'))).await?;
        app.handle_event(ctrl('c')).await?;

        assert!(app.should_quit);
        Ok(())
    }

    #[tokio::test]
    async fn test_help_toggle_and_escape() -> Result<()> {
        let (mut app, _rx) = app_with(MockServiceApi::new());

        app.handle_event(key(KeyCode::Char('?'))).await?;
        assert!(matches!(app.view, View::Help(_)));

        // Dashboard keys are ignored while help is shown
        app.handle_event(key(KeyCode::Char('a'))).await?;
        assert!(matches!(app.view, View::Help(_)));

        app.handle_event(key(KeyCode::Esc)).await?;
        assert!(matches!(app.view, View::Dashboard));

        app.handle_event(key(KeyCode::Char('a'))).await?;
        app.handle_event(key(KeyCode::Esc)).await?;
        assert!(matches!(app.view, View::Dashboard));

        app.handle_event(key(KeyCode::Char('q'))).await?;
        assert!(app.should_quit);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_expires_after_timeout() -> Result<()> {
        let (mut app, mut rx) = app_with(MockServiceApi::new());
        let started = tokio::time::Instant::now();

        app.set_message("Service added", Severity::Info);
        let id = app.messages.current().map(|m| m.id).expect("message");

        let event = rx.recv().await.expect("expiry");
        assert_eq!(started.elapsed(), Duration::from_secs(15));
        assert!(matches!(event, AppEvent::MessageExpired(expired) if expired == id));

        app.handle_event(event).await?;
        assert!(app.messages.current().is_none());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_old_timer_does_not_clear_newer_message() -> Result<()> {
        let (mut app, mut rx) = app_with(MockServiceApi::new());

        app.set_message("first", Severity::Info);
        tokio::time::sleep(Duration::from_secs(10)).await;
        app.set_message("second", Severity::Error);

        let first_expiry = rx.recv().await.expect("first expiry");
        app.handle_event(first_expiry).await?;
        assert_eq!(message_text(&app), Some(("second".to_string(), Severity::Error)));

        let second_expiry = rx.recv().await.expect("second expiry");
        app.handle_event(second_expiry).await?;
        assert!(app.messages.current().is_none());
        Ok(())
    }

    #[test]
    fn test_action_conversions() {
        let cases = [
            (KeyCode::Char('q'), KeyModifiers::NONE, Action::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL, Action::Quit),
            (KeyCode::Up, KeyModifiers::NONE, Action::MoveUp),
            (KeyCode::Char('k'), KeyModifiers::NONE, Action::MoveUp),
            (KeyCode::Down, KeyModifiers::NONE, Action::MoveDown),
            (KeyCode::Char('j'), KeyModifiers::NONE, Action::MoveDown),
            (KeyCode::Char('g'), KeyModifiers::NONE, Action::MoveTop),
            (KeyCode::Char('G'), KeyModifiers::SHIFT, Action::MoveBottom),
            (KeyCode::Char(' '), KeyModifiers::NONE, Action::ToggleSelect),
            (KeyCode::Char('a'), KeyModifiers::NONE, Action::AddService),
            (KeyCode::Char('d'), KeyModifiers::NONE, Action::DeleteSelected),
            (KeyCode::Delete, KeyModifiers::NONE, Action::DeleteSelected),
            (KeyCode::Char('r'), KeyModifiers::NONE, Action::Refresh),
            (KeyCode::F(5), KeyModifiers::NONE, Action::Refresh),
            (KeyCode::Char('s'), KeyModifiers::CONTROL, Action::SubmitForm),
            (KeyCode::Char('y'), KeyModifiers::NONE, Action::ConfirmAction),
            (KeyCode::Char('n'), KeyModifiers::NONE, Action::CancelAction),
            (KeyCode::Char('?'), KeyModifiers::NONE, Action::ShowHelp),
            (KeyCode::Char('x'), KeyModifiers::NONE, Action::None),
        ];

        for (code, modifiers, expected) in cases {
            assert_eq!(key_event_to_action(KeyEvent::new(code, modifiers)), expected, "{:?}", code);
        }
    }

    #[tokio::test]
    async fn test_event_channel() -> Result<()> {
        let (tx, mut rx) = mpsc::channel(10);

        assert!(tx.send(AppEvent::Quit).await.is_ok());
        assert!(tx.send(AppEvent::MessageExpired(7)).await.is_ok());

        assert!(matches!(rx.recv().await, Some(AppEvent::Quit)));
        assert!(matches!(rx.recv().await, Some(AppEvent::MessageExpired(7))));
        Ok(())
    }
}
