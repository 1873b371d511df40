use lenex::model::{AgeGroup, Club, Constructor, Contact, Event, Meet, Session, SwimStyle};
use lenex::{Document, LenexDocument};

const FIXTURE: &str = include_str!("fixtures/meet.lef");

fn reparse(document: &LenexDocument) -> LenexDocument {
    lenex::parse(lenex::to_xml(document)).unwrap()
}

#[test]
fn test_minimal_document_round_trip() {
    let xml = r#"<LENEX version="3.0"><CONSTRUCTOR name="X" registration="Y" version="1"><CONTACT email="a@b.c"/></CONSTRUCTOR></LENEX>"#;
    let document = lenex::parse(xml).unwrap();
    assert_eq!(reparse(&document), document);
}

#[test]
fn test_blank_revision_round_trip() {
    let xml = r#"<LENEX version="3.0" revision=""><CONSTRUCTOR name="X" registration="Y" version="1"><CONTACT email="a@b.c"/></CONSTRUCTOR></LENEX>"#;
    let document = lenex::parse(xml).unwrap();
    assert_eq!(document.revision(), None);
    assert_eq!(reparse(&document), document);
}

#[test]
fn test_full_fixture_round_trip() {
    let document = lenex::parse(FIXTURE).unwrap();
    let again = reparse(&document);
    assert_eq!(again, document);

    // serializing is stable once canonical
    assert_eq!(lenex::to_xml(&again), lenex::to_xml(&document));
}

#[test]
fn test_fixture_contents() {
    let document = lenex::parse(FIXTURE).unwrap();
    assert_eq!(document.revision(), Some("2"));
    assert_eq!(document.constructor().contact.email.as_deref(), Some("support@swimsoft.test"));

    let meet = &document.meets()[0];
    assert_eq!(meet.host_club.as_ref().and_then(|h| h.name.as_deref()), Some("SC Bern"));
    assert_eq!(meet.organizer.as_ref().and_then(|o| o.name.as_deref()), Some("Swiss Aquatics"));
    assert_eq!(
        meet.entry_schedule.as_ref().and_then(|s| s.deadline_date.as_deref()),
        Some("2026-03-20")
    );
    assert_eq!(meet.fees.len(), 1);
    assert_eq!(meet.clubs.len(), 2);
    assert_eq!(meet.clubs[1].name, None);

    let session = &meet.sessions[0];
    assert_eq!(session.events.len(), 2);
    let event = session.event("11").unwrap();
    assert_eq!(event.swim_style.stroke.as_deref(), Some("FREE"));
    assert_eq!(event.age_groups[0].rankings[0].place.as_deref(), Some("1"));
    assert_eq!(event.heats[0].heat_id.as_deref(), Some("1101"));

    let athlete = &meet.clubs[0].athletes[0];
    let entry = athlete.entry_for("11").unwrap();
    let pool = entry.meet_info.as_ref().and_then(|m| m.pool.as_ref()).unwrap();
    assert_eq!(pool.pool_type.as_deref(), Some("OUTDOOR"));
    assert_eq!(athlete.results[0].splits[0].distance.as_deref(), Some("50"));

    let relay = &meet.clubs[0].relays[0];
    assert_eq!(relay.entries[0].relay_positions[0].number.as_deref(), Some("2"));
    assert_eq!(relay.results[0].swim_time.as_deref(), Some("00:04:05.12"));

    let record_list = &document.record_lists()[0];
    assert_eq!(record_list.age_group.as_ref().unwrap().age_group_id, None);
    let record = &record_list.records[0];
    let holder = record.athlete.as_ref().unwrap();
    assert_eq!(holder.last_name.as_deref(), Some("Ledecky"));
    assert_eq!(holder.club.as_ref().and_then(|c| c.name.as_deref()), Some("Nation Team"));
    let relay_record = record_list.records[1].relay.as_ref().unwrap();
    assert_eq!(relay_record.relay_positions[0].athlete.gender.as_deref(), Some("M"));

    let standards = &document.time_standard_lists()[0];
    assert_eq!(standards.time_standards[0].swim_style.distance.as_deref(), Some("800"));
}

#[test]
fn test_built_document_serializes_and_parses() {
    let mut document = Document::new();
    document.set_version("3.0");
    document.set_constructor(Constructor {
        name: Some("Builder".into()),
        registration: Some("Tests".into()),
        version: Some("1".into()),
        contact: Contact {
            email: Some("builder@example.test".into()),
            ..Contact::default()
        },
    });
    document.add_meet(Meet {
        name: Some("Built <Meet> & Co".into()),
        city: Some("Basel".into()),
        nation: Some("SUI".into()),
        clubs: vec![Club {
            name: Some("O'Neill \"Sharks\"".into()),
            ..Club::default()
        }],
        sessions: vec![Session {
            date: Some("2026-06-01".into()),
            number: Some("1".into()),
            events: vec![Event {
                event_id: Some("1".into()),
                number: Some("1".into()),
                swim_style: SwimStyle {
                    distance: Some("50".into()),
                    relay_count: Some("1".into()),
                    stroke: Some("FLY".into()),
                    ..SwimStyle::default()
                },
                age_groups: vec![AgeGroup {
                    age_group_id: Some("1".into()),
                    age_min: Some("-1".into()),
                    age_max: Some("-1".into()),
                    ..AgeGroup::default()
                }],
                ..Event::default()
            }],
            ..Session::default()
        }],
        ..Meet::default()
    });

    let xml = document.to_xml().unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("Built &lt;Meet&gt; &amp; Co"));

    let parsed = lenex::parse(xml).unwrap();
    assert_eq!(parsed, document.finalize().unwrap());
}

#[test]
fn test_unfinished_document_cannot_serialize() {
    let mut document = Document::new();
    document.set_version("3.0");
    let err = document.to_xml().unwrap_err();
    assert!(err.is_schema());
    assert_eq!(err.to_string(), "CONSTRUCTOR element is required");
}
