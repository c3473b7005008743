//! Template resolution example
//!
//! Demonstrates wiring a facade to a notification bus and resolving
//! analytics templates as notifications arrive.
//!
//! Run with: cargo run -p marquee-core --example resolve_template

use marquee_core::{
    ContentMetadataSnapshot, FieldValue, FrameLocation, MetadataFacade, Notification,
    NotificationBus, PageContext, QueryFlags, SystemEnvironment, TokenProfile,
};

fn main() {
    println!("Marquee Core - Template Resolution Example");
    println!("==========================================\n");

    let bus = NotificationBus::default();
    let env = SystemEnvironment::new(
        "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X)",
        FrameLocation::Embedded {
            referrer: "https://partner.example.net/embed/1923".into(),
        },
    );
    let mut facade = MetadataFacade::new(
        &bus,
        TokenProfile::Full,
        QueryFlags::parse("?autoplay=true"),
        env,
    );

    let template = "[SHOW_NAME]|[DAY_PART]|[PLATFORM]|[INITIATE]|[MVPD]|[VIDEO_SCREEN]|[AIRDATE]";

    println!("Template:");
    println!("  {}\n", template);

    println!("Before any metadata:");
    println!("  ready:    {}", facade.is_ready());
    println!("  resolved: {:?}\n", facade.resolve(template));

    bus.publish(Notification::MetadataUpdated(ContentMetadataSnapshot {
        show_name: "The Tonight Show".into(),
        day_part: "Late Night".into(),
        entitlement: "auth".into(),
        air_date: Some(FieldValue::from("2024-03-05")),
        ..Default::default()
    }));

    println!("After metadata:");
    println!("  ready:    {}", facade.is_ready());
    println!("  resolved: {}\n", facade.resolve(template));

    bus.publish(Notification::PageContextUpdated(PageContext::with_provider("Comcast_SSO")));
    bus.publish(Notification::FullScreenChanged(true));

    println!("After provider id and full screen:");
    println!("  resolved: {}\n", facade.resolve(template));

    println!("Clock tokens (system time):");
    println!(
        "  {}",
        facade.resolve("[DAY_OF_WEEK] [MONTH]/[DATE_GET_DATE]/[DATE_GET_FULL_YEAR] [FORMATTED_MINUTES]")
    );
}
