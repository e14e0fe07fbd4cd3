use gemchat_core::config::{sanitize_api_key, Settings};
use gemchat_core::llm::build_contents;
use gemchat_core::*;
use tempfile::TempDir;

// ========================================================================
// Settings Tests (config/mod.rs)
// ========================================================================

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8501);
    assert_eq!(settings.server.title, "Gemini Chat");

    assert_eq!(settings.llm.base_url, "https://generativelanguage.googleapis.com");
    assert!(settings.llm.timeout_secs.is_none());
    assert_eq!(settings.llm.models_page_size, 50);

    assert_eq!(settings.chat.on_failure, FailurePolicy::Retain);
}

#[test]
fn test_settings_save_and_reload_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut settings = Settings::default();
    settings.server.port = 9000;
    settings.llm.timeout_secs = Some(30);
    settings.chat.on_failure = FailurePolicy::Rollback;
    settings.save_to(&config_path).unwrap();

    let loaded = Settings::load_from(&config_path).unwrap();
    assert_eq!(loaded.server.port, 9000);
    assert_eq!(loaded.llm.timeout_secs, Some(30));
    assert_eq!(loaded.chat.on_failure, FailurePolicy::Rollback);
}

#[test]
fn test_settings_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[server]\nport = 8080\n\n[chat]\non_failure = \"rollback\"\n")
        .unwrap();

    let loaded = Settings::load_from(&config_path).unwrap();
    assert_eq!(loaded.server.port, 8080);
    assert_eq!(loaded.server.host, "127.0.0.1");
    assert_eq!(loaded.llm.models_page_size, 50);
    assert_eq!(loaded.chat.on_failure, FailurePolicy::Rollback);
}

#[test]
fn test_settings_load_from_rejects_invalid_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[server\nport = ").unwrap();

    let result = Settings::load_from(&config_path);
    assert!(matches!(result, Err(ChatError::Config(_))));
}

#[test]
fn test_settings_build_client_uses_resolved_model() {
    let settings = Settings::default();
    let config = ChatConfig {
        api_key: "key".to_string(),
        model: "gemini-2.5-pro".to_string(),
    };

    let client = settings.build_client(&config).unwrap();
    assert_eq!(client.model(), "gemini-2.5-pro");
}

// ========================================================================
// Secrets / ChatConfig Tests (config/secrets.rs)
// ========================================================================

#[test]
fn test_chat_config_missing_key_is_config_error() {
    let secrets = Secrets::from_pairs(Vec::<(String, String)>::new());

    match ChatConfig::resolve(&secrets) {
        Err(ChatError::Config(message)) => assert!(message.contains("GEMINI_API_KEY")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_chat_config_blank_key_is_config_error() {
    let secrets = Secrets::from_pairs([("GEMINI_API_KEY", "  \n")]);
    assert!(ChatConfig::resolve(&secrets).is_err());
}

#[test]
fn test_chat_config_defaults_model() {
    let secrets = Secrets::from_pairs([("GEMINI_API_KEY", "AIza-test")]);

    let config = ChatConfig::resolve(&secrets).unwrap();
    assert_eq!(config.api_key, "AIza-test");
    assert_eq!(config.model, "gemini-3-flash-preview");
}

#[test]
fn test_chat_config_uses_configured_model() {
    let secrets = Secrets::from_pairs([
        ("GEMINI_API_KEY", "AIza-test"),
        ("GEMINI_MODEL", "gemini-2.5-flash"),
    ]);

    let config = ChatConfig::resolve(&secrets).unwrap();
    assert_eq!(config.model, "gemini-2.5-flash");
}

#[test]
fn test_chat_config_debug_redacts_key() {
    let secrets = Secrets::from_pairs([("GEMINI_API_KEY", "AIza-very-secret")]);
    let config = ChatConfig::resolve(&secrets).unwrap();

    let printed = format!("{config:?}");
    assert!(!printed.contains("AIza-very-secret"));
    assert!(printed.contains("<redacted>"));
}

#[test]
fn test_sanitize_api_key_strips_line_breaks() {
    assert_eq!(sanitize_api_key("  AIza\r\n123\n "), "AIza123");
}

#[test]
fn test_secrets_load_reads_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("secrets.toml");
    std::fs::write(
        &path,
        "GEMINI_API_KEY = \"AIza-from-file\"\nGEMINI_MODEL = \"gemini-2.0-flash\"\n",
    )
    .unwrap();

    let secrets = Secrets::load(&path).unwrap();
    let config = ChatConfig::resolve(&secrets).unwrap();
    assert_eq!(config.api_key, "AIza-from-file");
    assert_eq!(config.model, "gemini-2.0-flash");
}

#[test]
fn test_secrets_load_missing_file_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let secrets = Secrets::load(&temp_dir.path().join("absent.toml")).unwrap();
    assert!(secrets.get("GEMCHAT_TEST_SURELY_UNSET_KEY").is_none());
}

#[test]
fn test_secrets_load_falls_back_to_env() {
    std::env::set_var("GEMCHAT_TEST_ENV_SECRET", "from-env");

    let temp_dir = TempDir::new().unwrap();
    let secrets = Secrets::load(&temp_dir.path().join("absent.toml")).unwrap();
    assert_eq!(secrets.get("GEMCHAT_TEST_ENV_SECRET"), Some("from-env".to_string()));

    std::env::remove_var("GEMCHAT_TEST_ENV_SECRET");
}

// ========================================================================
// ConversationHistory Tests (context/history.rs)
// ========================================================================

#[test]
fn test_conversation_history_append_preserves_order() {
    let mut history = ConversationHistory::new();

    history.add_user_message("Hello");
    history.add_assistant_message("Hi there!");
    history.add_user_message("How are you?");

    let messages = history.all();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], Message::user("Hello"));
    assert_eq!(messages[1], Message::assistant("Hi there!"));
    assert_eq!(messages[2], Message::user("How are you?"));
}

#[test]
fn test_conversation_history_does_not_enforce_alternation() {
    let mut history = ConversationHistory::new();

    history.add_assistant_message("one");
    history.add_assistant_message("two");
    history.append(Message::assistant("two"));

    assert_eq!(history.len(), 3);
    assert_eq!(history.last_message().unwrap().role, Role::Assistant);
}

#[test]
fn test_conversation_history_clear_is_idempotent() {
    let mut history = ConversationHistory::new();
    history.clear();
    assert!(history.is_empty());

    for i in 0..25 {
        history.add_user_message(format!("Message {i}"));
    }
    history.clear();
    assert!(history.is_empty());
    history.clear();
    assert_eq!(history.len(), 0);
}

#[test]
fn test_conversation_history_pop_last() {
    let mut history = ConversationHistory::new();
    history.add_user_message("first");
    history.add_user_message("second");

    assert_eq!(history.pop_last(), Some(Message::user("second")));
    assert_eq!(history.len(), 1);
}

#[test]
fn test_conversation_history_estimate_tokens_basic() {
    let mut history = ConversationHistory::new();

    history.add_user_message("test");
    assert_eq!(history.estimate_tokens(), 1);

    history.add_user_message("test message with more content"); // 30 chars
    assert_eq!(history.estimate_tokens(), 1 + 8);
}

#[test]
fn test_message_role_serializes_lowercase() {
    let json = serde_json::to_value(Message::assistant("hi")).unwrap();
    assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hi"}));
}

// ========================================================================
// Request translation Tests (llm/translate.rs)
// ========================================================================

#[test]
fn test_translate_empty_history_scenario() {
    let contents = build_contents(&[], "Hello");

    let json = serde_json::to_value(&contents).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{"role": "user", "parts": [{"text": "Hello"}]}])
    );
}

#[test]
fn test_translate_history_scenario() {
    let history = vec![Message::user("Hi"), Message::assistant("Hello!")];

    let json = serde_json::to_value(build_contents(&history, "How are you?")).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"role": "user", "parts": [{"text": "Hi"}]},
            {"role": "model", "parts": [{"text": "Hello!"}]},
            {"role": "user", "parts": [{"text": "How are you?"}]}
        ])
    );
}

#[test]
fn test_translate_preserves_order_and_appends_prompt_last() {
    let histories: Vec<Vec<Message>> = vec![
        vec![Message::user("a")],
        vec![Message::assistant("a"), Message::assistant("b")],
        (0..10)
            .map(|i| {
                if i % 3 == 0 {
                    Message::assistant(format!("m{i}"))
                } else {
                    Message::user(format!("m{i}"))
                }
            })
            .collect(),
    ];

    for history in histories {
        let contents = build_contents(&history, "prompt");

        assert_eq!(contents.len(), history.len() + 1);
        let last = contents.last().unwrap();
        assert_eq!(last.role, WireRole::User);
        assert_eq!(last.parts, vec![Part { text: "prompt".to_string() }]);

        for (message, content) in history.iter().zip(&contents) {
            assert_eq!(content.role, message.role.wire_role());
            assert_eq!(content.parts[0].text, message.content);
        }
    }
}
