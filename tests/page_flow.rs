mod common;

use std::time::Duration;

use common::{PROFILE_URL, PageScript, ScriptedFactory, ScriptedSession, test_config};
use profile_scraper::controller::{detect_auth_wall, dismiss_popup, scroll_to_bottom};
use profile_scraper::page_extractor::{extract_page, section_by_heading};
use profile_scraper::{ExperienceEntry, JsonFileStore, OutputMode, run};

const UI_TIMEOUT: Duration = Duration::from_millis(50);

#[tokio::test]
async fn structured_data_wins_and_sections_are_parsed() {
    let session = ScriptedSession::new(PageScript::profile());
    let record = extract_page(&session)
        .await
        .unwrap()
        .into_record(PROFILE_URL, 0);

    // og:title names someone else; the JSON-LD Person wins
    assert_eq!(record.name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(record.headline.as_deref(), Some("Analyst"));
    assert_eq!(record.location.as_deref(), Some("London"));
    assert_eq!(record.about.as_deref(), Some("First programmer"));
    assert_eq!(record.education_top.as_deref(), Some("University of London"));
    assert_eq!(record.current_company, None);

    assert_eq!(
        record.followers_and_connections,
        vec!["1,204 followers", "500+ connections"]
    );
    assert_eq!(
        record.experience,
        vec![ExperienceEntry {
            role: "Software".into(),
            company: "Engineer Google".into(),
            duration: Some("2020 - Present".into()),
            total_time: Some("1 year 2 months".into()),
        }]
    );
    assert_eq!(record.education.len(), 1);
    assert!(record.skills.is_empty());
    assert!(record.html_length > 1000);
}

#[tokio::test]
async fn missing_section_is_empty_not_an_error() {
    let session = ScriptedSession::new(PageScript::profile().without_section("Experience"));
    assert!(section_by_heading(&session, "Experience").await.is_empty());

    let record = extract_page(&session)
        .await
        .unwrap()
        .into_record(PROFILE_URL, 0);
    assert!(record.experience.is_empty());
    assert_eq!(record.education.len(), 1);
}

#[tokio::test]
async fn empty_page_resolves_nothing_and_never_emits_empty_strings() {
    let mut script = PageScript::profile().markup("<html></html>");
    script.title = String::new();
    script.dom = serde_json::json!({ "heading": "   ", "subline": [] });
    script.sections.clear();
    let session = ScriptedSession::new(script);

    let record = extract_page(&session)
        .await
        .unwrap()
        .into_record(PROFILE_URL, 0);
    let json = serde_json::to_value(&record).unwrap();
    for key in ["name", "headline", "location", "about", "currentCompany", "educationTop"] {
        assert!(json.get(key).is_none(), "{key} should be absent");
    }
}

#[tokio::test]
async fn popups_are_dismissed_one_per_call_in_strategy_order() {
    let session = ScriptedSession::new(
        PageScript::profile()
            .with_element("[role=\"dialog\"]")
            .with_element(".contextual-sign-in-modal"),
    );

    assert_eq!(
        dismiss_popup(&session, UI_TIMEOUT).await,
        Some("contextual sign-in modal")
    );
    assert_eq!(
        session.recorder().events(),
        vec!["click:.contextual-sign-in-modal__modal-dismiss"]
    );

    assert_eq!(dismiss_popup(&session, UI_TIMEOUT).await, Some("generic dialog"));
    assert_eq!(dismiss_popup(&session, UI_TIMEOUT).await, None);
    assert_eq!(session.recorder().events().len(), 2);
}

#[tokio::test]
async fn hidden_overlay_is_not_dismissed() {
    let session = ScriptedSession::new(PageScript::profile().with_hidden(".contextual-sign-in-modal"));
    assert_eq!(dismiss_popup(&session, UI_TIMEOUT).await, None);
    assert!(session.recorder().events().is_empty());
}

#[tokio::test]
async fn cancel_key_is_the_fallback() {
    let broken_close = PageScript::profile()
        .with_element(".modal__overlay--visible")
        .with_broken_click("button.modal__dismiss");
    let session = ScriptedSession::new(broken_close);
    assert_eq!(dismiss_popup(&session, UI_TIMEOUT).await, Some("sign-in overlay"));
    assert_eq!(session.recorder().events(), vec!["key:Escape"]);

    let no_close = PageScript::profile().with_element(".top-level-modal-container");
    let session = ScriptedSession::new(no_close);
    assert_eq!(dismiss_popup(&session, UI_TIMEOUT).await, Some("top-level modal"));
    assert_eq!(session.recorder().events(), vec!["key:Escape"]);
}

#[tokio::test]
async fn auth_wall_signals_are_or_combined() {
    let clean = ScriptedSession::new(PageScript::profile());
    assert!(detect_auth_wall(&clean, UI_TIMEOUT).await.is_empty());

    let marker_only = ScriptedSession::new(PageScript::profile().with_element("form.login__form"));
    assert_eq!(
        detect_auth_wall(&marker_only, UI_TIMEOUT).await,
        vec!["form.login__form"]
    );

    let walled = ScriptedSession::new(PageScript::auth_wall());
    let signals = detect_auth_wall(&walled, UI_TIMEOUT).await;
    assert!(signals.contains(&"/authwall"));
    assert!(signals.contains(&".authwall-join-form"));
    assert!(signals.contains(&"sign up"));
}

#[tokio::test]
async fn headline_words_and_slugs_never_trip_the_auth_check() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let mut script = PageScript::profile();
    script.final_url = "https://www.linkedin.com/in/loginov-ivan".to_string();
    script.title = "Ivan Loginov - Design Intern, Catalog Inc | LinkedIn".to_string();
    assert!(
        detect_auth_wall(&ScriptedSession::new(script.clone()), UI_TIMEOUT)
            .await
            .is_empty()
    );

    let factory = ScriptedFactory::new(vec![script]);
    let record = run(
        &config,
        &factory,
        &JsonFileStore,
        "https://www.linkedin.com/in/loginov-ivan",
    )
    .await
    .unwrap();
    assert_eq!(record.retry_count, 0);
    assert_eq!(factory.recorder.opens(), 1);
}

#[tokio::test]
async fn scrolling_stops_at_the_bottom() {
    let session = ScriptedSession::new(PageScript::profile());
    assert_eq!(scroll_to_bottom(&session, 8, Duration::ZERO).await, 2);
    assert_eq!(session.scrolls(), 2);

    let mut tall = PageScript::profile();
    tall.document_height = 100_000.0;
    let session = ScriptedSession::new(tall);
    assert_eq!(scroll_to_bottom(&session, 4, Duration::ZERO).await, 4);
    assert_eq!(session.scrolls(), 4);
}

#[tokio::test]
async fn popup_check_runs_after_load_and_after_scroll() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.output_mode = OutputMode::Single;

    let factory = ScriptedFactory::new(vec![
        PageScript::profile()
            .with_element(".contextual-sign-in-modal")
            .with_element("#artdeco-global-alert-container"),
    ]);
    let record = run(&config, &factory, &JsonFileStore, PROFILE_URL)
        .await
        .unwrap();
    assert_eq!(record.retry_count, 0);

    let clicks: Vec<String> = factory
        .recorder
        .events()
        .into_iter()
        .filter(|e| e.starts_with("click:"))
        .collect();
    assert_eq!(
        clicks,
        vec![
            "click:.contextual-sign-in-modal__modal-dismiss",
            "click:button[action-type=\"ACCEPT\"]",
        ]
    );
    assert_eq!(factory.recorder.events().last().map(String::as_str), Some("close"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.output_file).unwrap()).unwrap();
    assert_eq!(written["name"], "Ada Lovelace");
}
