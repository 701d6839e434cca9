use std::collections::HashMap;

use slackcards::model::Member;
use slackcards::vcard;

/// Minimal reader for the line-record format: splits property name from
/// value at the first unparameterized colon and undoes text escaping.
fn parse_card(card: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in card.lines() {
        let (name, value) = match line.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };
        let name = name.split(';').next().unwrap().to_string();
        fields.insert(name, unescape(value));
    }
    fields
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

// ==========================================================================
// ROUND-TRIP
// ==========================================================================

#[test]
fn supported_fields_survive_a_round_trip() {
    let mut m = Member::new("U1", "jane");
    m.real_name = Some("Jane Doe".into());
    m.email = Some("jane@example.com".into());
    m.phone = Some("+1 (555) 010-0100".into());
    m.title = Some("Staff Engineer".into());

    let card = vcard::render(&m, None).unwrap();
    let fields = parse_card(&card);

    assert_eq!(fields["FN"], "Jane Doe");
    assert_eq!(fields["EMAIL"], "jane@example.com");
    assert_eq!(fields["TEL"], "+1 (555) 010-0100");
    assert_eq!(fields["TITLE"], "Staff Engineer");
}

#[test]
fn escaped_characters_survive_a_round_trip() {
    let mut m = Member::new("U1", "jane");
    m.real_name = Some("Doe; Jane, PhD".into());
    m.title = Some("R&D\nLead \\ Backslash".into());

    let card = vcard::render(&m, None).unwrap();
    let fields = parse_card(&card);

    assert_eq!(fields["FN"], "Doe; Jane, PhD");
    assert_eq!(fields["TITLE"], "R&D\nLead \\ Backslash");
}

#[test]
fn absent_optional_fields_do_not_reappear() {
    let mut m = Member::new("U1", "jane");
    m.real_name = Some("Jane Doe".into());

    let card = vcard::render(&m, None).unwrap();
    let fields = parse_card(&card);

    assert!(!fields.contains_key("EMAIL"));
    assert!(!fields.contains_key("TEL"));
    assert!(!fields.contains_key("TITLE"));
    assert!(!fields.contains_key("PHOTO"));
}

#[test]
fn envelope_is_well_formed() {
    let mut m = Member::new("U1", "jane");
    m.real_name = Some("Jane Doe".into());

    let card = vcard::render(&m, None).unwrap();
    let lines: Vec<&str> = card.lines().collect();

    assert_eq!(lines.first(), Some(&"BEGIN:VCARD"));
    assert_eq!(lines.get(1), Some(&"VERSION:3.0"));
    assert_eq!(lines.last(), Some(&"END:VCARD"));
}
