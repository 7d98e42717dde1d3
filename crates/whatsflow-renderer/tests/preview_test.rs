//! End-to-end preview tests: walking the bundled insurance demo flow the way
//! a WhatsApp client would.

use serde_json::json;
use whatsflow_flow::FlowDocument;
use whatsflow_renderer::{Outcome, PreviewSession, Widget};

const INSURANCE_FLOW: &str = include_str!("../../../demos/insurance.json");

fn demo_session() -> PreviewSession {
    let doc = FlowDocument::from_json(INSURANCE_FLOW).expect("demo flow parses");
    PreviewSession::new(doc).expect("demo flow has screens")
}

#[test]
fn test_first_screen_renders_nav_list() {
    let session = demo_session();
    let rendered = session.render();
    assert_eq!(rendered.id.as_str(), "FIRST_SCREEN");
    assert_eq!(rendered.title, "Our offers");
    assert!(!rendered.terminal);

    let rows = match rendered.widget("insurances") {
        Some(Widget::NavList { rows, .. }) => rows,
        other => panic!("unexpected widget: {:?}", other),
    };
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].title, "Home Insurance");
    assert_eq!(rows[0].end_title.as_deref(), Some("$100"));
    assert!(rows.iter().all(|row| row.action.is_some()));

    // No document footer on this screen, so the button is generated.
    assert!(rendered.footer.synthetic);
    assert_eq!(rendered.footer.label, "Proceed");
}

#[test]
fn test_full_walk_to_completion() {
    let mut session = demo_session();

    // Pick an insurance from the navigation list.
    let action = match session.render().widget("insurances") {
        Some(Widget::NavList { rows, .. }) => rows[1].action.clone().unwrap(),
        other => panic!("unexpected widget: {:?}", other),
    };
    assert_eq!(
        session.activate(&action).unwrap(),
        Outcome::Navigated("QUOTE_SCREEN".into())
    );

    // The quote form renders with its initial value and example options.
    let rendered = session.render();
    match rendered.widget("full_name") {
        Some(Widget::TextField { value, .. }) => assert_eq!(value.as_deref(), Some("")),
        other => panic!("unexpected widget: {:?}", other),
    }
    match rendered.widget("appointment_type") {
        Some(Widget::RadioGroup { options, .. }) => {
            assert_eq!(options.len(), 2);
            assert_eq!(options[0].title, "Online");
        }
        other => panic!("unexpected widget: {:?}", other),
    }
    assert!(!rendered.footer.synthetic);
    assert_eq!(rendered.footer.label, "Continue");

    // Fill it in and press the document footer.
    session.set_text("full_name", "Ada Lovelace").unwrap();
    session.set_text("email", "ada@example.com").unwrap();
    session.select_radio("appointment_type", "1").unwrap();
    assert_eq!(
        session.activate_footer().unwrap(),
        Outcome::Navigated("COVERAGE_SCREEN".into())
    );

    // Tailor the cover: two add-ons, a billing cadence, one chip.
    session.toggle_checkbox("addons", "roadside").unwrap();
    session.toggle_checkbox("addons", "legal").unwrap();
    session.select_dropdown("billing", "monthly").unwrap();
    session.toggle_chip("interests", "storm").unwrap();
    assert_eq!(
        session.activate_footer().unwrap(),
        Outcome::Navigated("CONTACT_SCREEN".into())
    );

    // Contact details, then submit.
    session.set_text("phone", "+351 910 000 000").unwrap();
    session.set_date("callback_date", "1700000000000").unwrap();
    session.set_opt_in("terms", true).unwrap();
    let outcome = session.activate_footer().unwrap();

    let expected = json!({
        "phone": "+351 910 000 000",
        "callback_date": "1700000000000",
        "agreed": true
    });
    assert_eq!(
        outcome,
        Outcome::Completed {
            payload: expected.as_object().cloned().unwrap()
        }
    );
    assert!(session.is_completed());
    assert_eq!(
        session.completion().map(|payload| payload["agreed"].clone()),
        Some(json!(true))
    );
}

#[test]
fn test_radio_select_action_sends_data_exchange() {
    let mut session = demo_session();
    session.jump_to(1).unwrap();
    session.select_radio("appointment_type", "2").unwrap();

    let on_select = match session.render().widget("appointment_type") {
        Some(Widget::RadioGroup { on_select, .. }) => on_select.clone().unwrap(),
        other => panic!("unexpected widget: {:?}", other),
    };
    let outcome = session.activate(&on_select).unwrap();

    // The quote screen is not terminal, so the exchange steps forward.
    assert_eq!(outcome, Outcome::Navigated("COVERAGE_SCREEN".into()));
    assert_eq!(session.exchanges().len(), 1);
    assert_eq!(session.exchanges()[0].screen.as_str(), "QUOTE_SCREEN");
    assert_eq!(
        session.exchanges()[0].payload["appointment_type"],
        json!("2")
    );
}

#[test]
fn test_back_returns_through_visited_screens() {
    let mut session = demo_session();
    session.jump_to(3).unwrap();
    session.jump_to(1).unwrap();
    assert_eq!(session.back().unwrap().unwrap().id.as_str(), "CONTACT_SCREEN");
    assert_eq!(session.back().unwrap().unwrap().id.as_str(), "FIRST_SCREEN");
    assert!(session.back().unwrap().is_none());
}
