//! Integration tests for Marquee Core

use marquee_core::{
    ContentMetadataSnapshot, Error, FacadeConfig, FieldValue, FixedEnvironment, FrameLocation,
    MetadataFacade, Notification, NotificationBus, PageContext, QueryFlags, Token, TokenProfile,
};

const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0";

/// Wednesday 6 March 2024, 09:05 at UTC-5
fn wednesday_morning() -> FixedEnvironment {
    FixedEnvironment::at("2024-03-06T09:05:00-05:00").unwrap()
}

fn sample_snapshot() -> ContentMetadataSnapshot {
    ContentMetadataSnapshot {
        show_name: "The Tonight Show".into(),
        day_part: "Late Night".into(),
        primary_category: Some("Late Night".into()),
        secondary_category: None,
        entitlement: "auth".into(),
        air_order: Some(FieldValue::Integer(1923)),
        guid: "fb5a0c8e-0b51".into(),
        air_date: Some(FieldValue::from("2024-03-05")),
        season_number: Some(FieldValue::Integer(11)),
    }
}

fn ready_facade(query: &str) -> (NotificationBus, MetadataFacade) {
    let bus = NotificationBus::default();
    let facade = MetadataFacade::new(
        &bus,
        TokenProfile::Full,
        QueryFlags::parse(query),
        wednesday_morning().with_user_agent(DESKTOP_UA),
    );
    bus.publish(Notification::MetadataUpdated(sample_snapshot()));
    (bus, facade)
}

// =============================================================================
// Readiness Tests
// =============================================================================

#[test]
fn test_not_ready_before_metadata() {
    let bus = NotificationBus::default();
    let mut facade =
        MetadataFacade::new(&bus, TokenProfile::Full, QueryFlags::default(), wednesday_morning());

    assert!(!facade.is_ready());
    for template in ["", "plain", "[SHOW_NAME]", "[DATE_GET_FULL_YEAR]"] {
        assert_eq!(facade.resolve(template), "");
    }
}

#[test]
fn test_try_resolve_reports_not_ready() {
    let mut facade =
        MetadataFacade::detached(TokenProfile::Full, QueryFlags::default(), wednesday_morning());
    let err = facade.try_resolve("[SHOW_NAME]").unwrap_err();
    assert!(matches!(err, Error::NotReady));
    assert!(err.is_recoverable());
}

#[test]
fn test_ready_after_metadata() {
    let (_bus, mut facade) = ready_facade("");
    assert!(facade.is_ready());
    assert_eq!(facade.try_resolve("[SHOW_NAME]").unwrap(), "The Tonight Show");
}

// =============================================================================
// Substitution Tests
// =============================================================================

#[test]
fn test_templates_without_tokens_are_unchanged() {
    let (_bus, mut facade) = ready_facade("");
    for template in [
        "",
        "nbc.com",
        "[UNKNOWN]",
        "[show_name]",
        "a[b]c",
        "SHOW_NAME",
        "brackets [ and ] alone",
    ] {
        assert_eq!(facade.resolve(template), template);
    }
}

#[test]
fn test_each_occurrence_replaced_once() {
    let (_bus, mut facade) = ready_facade("");
    assert_eq!(
        facade.resolve("[SHOW_NAME]-[SHOW_NAME]"),
        "The Tonight Show-The Tonight Show"
    );
    assert_eq!(
        facade.resolve("[GUID][SHOW_NAME][GUID]"),
        "fb5a0c8e-0b51The Tonight Showfb5a0c8e-0b51"
    );
}

#[test]
fn test_date_and_time_tokens() {
    let (_bus, mut facade) = ready_facade("");
    assert_eq!(
        facade.resolve("[DAY_OF_WEEK] [MONTH]/[DATE_GET_DATE]/[DATE_GET_FULL_YEAR] [FORMATTED_MINUTES]"),
        "Wednesday 03/06/2024 09:05"
    );
    assert_eq!(facade.resolve("[DATE_GET_HOURS]"), "09:00");
}

#[test]
fn test_full_template() {
    let bus = NotificationBus::default();
    let env = wednesday_morning()
        .with_user_agent(IPHONE_UA)
        .with_location(FrameLocation::TopLevel("https://www.example.com/watch/1923".into()));
    let mut facade =
        MetadataFacade::new(&bus, TokenProfile::Full, QueryFlags::parse("?autoplay=true"), env);

    bus.publish(Notification::MetadataUpdated(sample_snapshot()));
    bus.publish(Notification::PageContextUpdated(PageContext::with_provider("Comcast_SSO")));
    bus.publish(Notification::FullScreenChanged(true));

    let template = Token::ALL
        .iter()
        .map(|token| token.literal())
        .collect::<Vec<_>>()
        .join("|");

    assert_eq!(
        facade.resolve(&template),
        [
            "The Tonight Show",
            "Late Night",
            "09:05",
            "09:00",
            "Wednesday",
            "03",
            "06",
            "2024",
            "Mobile",
            "Comcast_SSO",
            "Auto Play",
            "Late Night",
            "",
            "Full",
            "Restricted",
            "https://www.example.com/watch/1923",
            "1923",
            "fb5a0c8e-0b51",
            "3/5/2024",
            "11",
        ]
        .join("|")
    );
}

#[test]
fn test_resolver_output_is_not_rescanned() {
    let bus = NotificationBus::default();
    let mut facade =
        MetadataFacade::new(&bus, TokenProfile::Full, QueryFlags::default(), wednesday_morning());

    let snapshot = ContentMetadataSnapshot {
        show_name: "[DAY_PART] [MVPD]".into(),
        day_part: "Primetime".into(),
        ..Default::default()
    };
    bus.publish(Notification::MetadataUpdated(snapshot));

    assert_eq!(facade.resolve("[SHOW_NAME]"), "[DAY_PART] [MVPD]");
    assert_eq!(facade.resolve("[DAY_PART]:[SHOW_NAME]"), "Primetime:[DAY_PART] [MVPD]");
}

// =============================================================================
// Resolver Rule Tests
// =============================================================================

#[test]
fn test_asset_status() {
    let (bus, mut facade) = ready_facade("");
    assert_eq!(facade.resolve("[ASSETSTATUS]"), "Restricted");

    for entitlement in ["free", "", "Auth"] {
        let snapshot = ContentMetadataSnapshot {
            entitlement: entitlement.into(),
            ..sample_snapshot()
        };
        bus.publish(Notification::MetadataUpdated(snapshot));
        assert_eq!(facade.resolve("[ASSETSTATUS]"), "Unrestricted");
    }
}

#[test]
fn test_initiate_from_query() {
    let (_bus, mut facade) = ready_facade("?autoplay=true");
    assert_eq!(facade.resolve("[INITIATE]"), "Auto Play");

    let (_bus, mut facade) = ready_facade("?autoplay=false");
    assert_eq!(facade.resolve("[INITIATE]"), "Manual");

    let (_bus, mut facade) = ready_facade("?fwAutoPlay=TRUE&autoplay=false");
    assert_eq!(facade.resolve("[INITIATE]"), "Auto Play");
}

#[test]
fn test_provider_id_sentinels() {
    let (bus, mut facade) = ready_facade("");
    assert_eq!(facade.resolve("[MVPD]"), "");

    bus.publish(Notification::PageContextUpdated(PageContext::with_provider("Dish")));
    assert_eq!(facade.resolve("[MVPD]"), "Dish");

    bus.publish(Notification::PageContextUpdated(PageContext::default()));
    bus.publish(Notification::PageContextUpdated(PageContext::with_provider("undefined")));
    assert_eq!(facade.resolve("[MVPD]"), "Dish");

    let wire = Notification::from_json(r#"{"event": "page_context_updated", "data": {"mvpdid": null}}"#)
        .unwrap();
    bus.publish(wire);
    assert_eq!(facade.resolve("[MVPD]"), "Dish");
}

#[test]
fn test_long_event_replay_keeps_runtime_state() {
    let bus = NotificationBus::default();
    let mut facade =
        MetadataFacade::new(&bus, TokenProfile::Full, QueryFlags::default(), wednesday_morning());

    let mut events = vec![
        r#"{"event": "page_context_updated", "data": {"mvpdid": "Dish"}}"#.to_string(),
        r#"{"event": "full_screen_changed", "data": true}"#.to_string(),
    ];
    for i in 0..200 {
        events.push(format!(
            r#"{{"event": "metadata_updated", "data": {{"showName": "Episode {i}"}}}}"#
        ));
    }
    events.push(r#"{"event": "page_context_updated", "data": {"mvpdid": "undefined"}}"#.to_string());

    let replay = Notification::list_from_json(&format!("[{}]", events.join(","))).unwrap();
    for notification in replay {
        bus.publish(notification);
    }

    assert_eq!(
        facade.resolve("[SHOW_NAME] [MVPD] [VIDEO_SCREEN]"),
        "Episode 199 Dish Full"
    );
}

#[test]
fn test_numeric_categories_from_wire() {
    let bus = NotificationBus::default();
    let mut facade =
        MetadataFacade::new(&bus, TokenProfile::Full, QueryFlags::default(), wednesday_morning());

    let event = Notification::from_json(
        r#"{"event": "metadata_updated", "data": {"showName": "X", "primaryCategory": 5, "secondaryCategory": null}}"#,
    )
    .unwrap();
    bus.publish(event);

    assert!(facade.is_ready());
    assert_eq!(facade.resolve("[PRIMARY_CATEGORY]|[SECONDARY_CATEGORY]"), "5|");
}

#[test]
fn test_snapshot_replaces_without_merge() {
    let (bus, mut facade) = ready_facade("");
    assert_eq!(facade.resolve("[SEASON]/[EPISODE_NUM]"), "11/1923");

    bus.publish(Notification::MetadataUpdated(ContentMetadataSnapshot::new("Clip")));
    assert_eq!(facade.resolve("[SHOW_NAME] [SEASON]/[EPISODE_NUM]/[AIRDATE]"), "Clip //");
}

#[test]
fn test_notification_order_is_commutative() {
    let env = || wednesday_morning().with_user_agent(DESKTOP_UA);
    let mut forward = MetadataFacade::detached(TokenProfile::Full, QueryFlags::default(), env());
    let mut backward = MetadataFacade::detached(TokenProfile::Full, QueryFlags::default(), env());

    let notifications = vec![
        Notification::MetadataUpdated(sample_snapshot()),
        Notification::PageContextUpdated(PageContext::with_provider("Dish")),
        Notification::FullScreenChanged(true),
    ];
    for n in notifications.iter().cloned() {
        forward.apply(n);
    }
    for n in notifications.into_iter().rev() {
        backward.apply(n);
    }

    let template = "[SHOW_NAME] [MVPD] [VIDEO_SCREEN]";
    assert_eq!(forward.resolve(template), backward.resolve(template));
    assert_eq!(forward.resolve(template), "The Tonight Show Dish Full");
}

// =============================================================================
// Profile Tests
// =============================================================================

#[test]
fn test_reduced_profile() {
    let bus = NotificationBus::default();
    let mut facade =
        MetadataFacade::new(&bus, TokenProfile::Reduced, QueryFlags::default(), wednesday_morning());
    bus.publish(Notification::MetadataUpdated(sample_snapshot()));
    bus.publish(Notification::FullScreenChanged(true));

    assert_eq!(facade.resolve("[SHOW_NAME]"), "The Tonight Show");
    assert_eq!(facade.resolve("[GUID] [SEASON] [VIDEO_SCREEN]"), "[GUID] [SEASON] [VIDEO_SCREEN]");
    assert!(!facade.runtime().is_full_screen());
}

#[test]
fn test_custom_profile_from_config() {
    let bus = NotificationBus::default();
    let config = FacadeConfig::from_json_str(
        r#"{
            "profile": {"custom": ["SHOW_NAME", "PLAYER_URL"]},
            "location": {"embedded": {"referrer": "https://partner.example.net/embed"}}
        }"#,
    )
    .unwrap();
    let mut facade = MetadataFacade::from_config(&bus, &config).unwrap();
    bus.publish(Notification::MetadataUpdated(sample_snapshot()));

    assert_eq!(
        facade.resolve("[SHOW_NAME] @ [PLAYER_URL] [GUID]"),
        "The Tonight Show @ https://partner.example.net/embed [GUID]"
    );
}

#[test]
fn test_notifications_from_json() {
    let bus = NotificationBus::default();
    let mut facade =
        MetadataFacade::new(&bus, TokenProfile::Full, QueryFlags::default(), wednesday_morning());

    let events = Notification::list_from_json(
        r#"[
            {"event": "metadata_updated", "data": {
                "showName": "Nightly News",
                "dayPart": "Evening",
                "entitlement": "free",
                "airOrder": "",
                "guid": "n-1",
                "airDate": "2024-02-29T23:30:00Z",
                "seasonNumber": 0
            }},
            {"event": "full_screen_changed", "data": false}
        ]"#,
    )
    .unwrap();
    for event in events {
        bus.publish(event);
    }

    assert_eq!(
        facade.resolve("[SHOW_NAME]|[ASSETSTATUS]|[EPISODE_NUM]|[SEASON]|[AIRDATE]|[VIDEO_SCREEN]"),
        "Nightly News|Unrestricted|||2/29/2024|Normal"
    );
}
