//! vCard 3.0 rendering.
//!
//! Line order is fixed: FN/N, EMAIL, TEL, service handles, TITLE, PHOTO.
//! Service handles are written from [`SERVICE_FIELDS`] in declaration
//! order, and for each service the IMPP line precedes the X- line; Google
//! Contacts ignores the X- form when the Apple IMPP form comes after it.
//! Handles for services outside the table follow as bare X- lines in
//! lexicographic order.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::{ExportError, ExportResult};
use crate::model::Member;

/// An avatar image ready for embedding.
pub struct Photo {
    pub data: Vec<u8>,
    /// vCard TYPE parameter, e.g. "JPEG".
    pub format: String,
}

impl Photo {
    pub fn new(data: Vec<u8>, source_url: &str) -> Self {
        Self {
            data,
            format: format_from_url(source_url).to_string(),
        }
    }
}

struct ServiceField {
    service: &'static str,
    /// X-SERVICE-TYPE value, capitalized the way clients expect it.
    service_type: &'static str,
    x_label: &'static str,
}

/// Services with a conventional card field, in output order.
const SERVICE_FIELDS: &[ServiceField] = &[ServiceField {
    service: "skype",
    service_type: "Skype",
    x_label: "X-SKYPE",
}];

/// Render one member as a vCard 3.0 document, containing only the fields
/// present on the record.
pub fn render(member: &Member, photo: Option<&Photo>) -> ExportResult<String> {
    let name = member
        .export_name()
        .ok_or_else(|| ExportError::NoUsableName {
            member_id: member.id.clone(),
        })?;

    let mut card = String::new();
    card.push_str("BEGIN:VCARD\nVERSION:3.0\n");

    card.push_str(&format!("FN:{}\n", escape(name)));
    match (&member.last_name, &member.first_name) {
        (Some(last), Some(first)) => {
            card.push_str(&format!("N:{};{};;;\n", escape(last), escape(first)));
        }
        _ => card.push_str(&format!("N:{};;;;\n", escape(name))),
    }

    if let Some(email) = &member.email {
        card.push_str(&format!("EMAIL;TYPE=INTERNET;TYPE=HOME:{}\n", escape(email)));
    }
    if let Some(phone) = &member.phone {
        card.push_str(&format!("TEL;PREF=1;TYPE=CELL:{}\n", escape(phone)));
    }

    for field in SERVICE_FIELDS {
        if let Some(handle) = member.handles.get(field.service) {
            card.push_str(&format!(
                "IMPP;X-SERVICE-TYPE={};type=HOME;{}:{}\n",
                field.service_type,
                field.service,
                escape(handle)
            ));
            card.push_str(&format!("{}:{}\n", field.x_label, escape(handle)));
        }
    }
    for (service, handle) in &member.handles {
        if SERVICE_FIELDS.iter().any(|f| f.service == service) {
            continue;
        }
        card.push_str(&format!(
            "X-{}:{}\n",
            service.to_uppercase(),
            escape(handle)
        ));
    }

    if let Some(title) = &member.title {
        card.push_str(&format!("TITLE:{}\n", escape(title)));
    }

    if let Some(photo) = photo {
        card.push_str(&format!(
            "PHOTO;ENCODING=b;TYPE={}:{}\n",
            photo.format,
            BASE64.encode(&photo.data)
        ));
    }

    card.push_str("END:VCARD\n");
    Ok(card)
}

/// Output file name for a member's card, derived deterministically from the
/// same name the card itself carries.
pub fn file_name(member: &Member) -> ExportResult<String> {
    let name = member
        .export_name()
        .ok_or_else(|| ExportError::NoUsableName {
            member_id: member.id.clone(),
        })?;
    Ok(format!("{}.vcf", slugify(name)))
}

/// Lowercased; whitespace runs and dashes become underscores; anything else
/// that is not alphanumeric, underscore, or dot is dropped. Keeps the name
/// safe as a file name on every platform.
fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() || c == '-' => Some('_'),
            c if c.is_alphanumeric() || c == '_' || c == '.' => Some(c),
            _ => None,
        })
        .collect()
}

/// vCard 3.0 text escaping (RFC 2426 section 2.4.2).
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn format_from_url(url: &str) -> &'static str {
    let path = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    match file
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "JPEG",
        Some("png") => "PNG",
        Some("gif") => "GIF",
        _ => "JPEG",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_member(name: &str) -> Member {
        let mut m = Member::new("U1", "jdoe");
        m.real_name = Some(name.to_string());
        m
    }

    #[test]
    fn minimal_card_has_envelope_and_name_only() {
        let card = render(&named_member("Jane Doe"), None).unwrap();
        assert_eq!(
            card,
            "BEGIN:VCARD\nVERSION:3.0\nFN:Jane Doe\nN:Jane Doe;;;;\nEND:VCARD\n"
        );
    }

    #[test]
    fn structured_name_uses_last_and_first() {
        let mut m = named_member("Jane Doe");
        m.first_name = Some("Jane".into());
        m.last_name = Some("Doe".into());
        let card = render(&m, None).unwrap();
        assert!(card.contains("N:Doe;Jane;;;\n"));
    }

    #[test]
    fn name_falls_back_to_id() {
        let m = Member::new("U999", "");
        let card = render(&m, None).unwrap();
        assert!(card.contains("FN:U999\n"));
    }

    #[test]
    fn no_usable_name_fails() {
        let m = Member::new("", "");
        assert!(matches!(
            render(&m, None),
            Err(ExportError::NoUsableName { .. })
        ));
    }

    #[test]
    fn impp_line_precedes_x_line() {
        let mut m = named_member("Jane Doe");
        m.handles.insert("skype".into(), "jane.doe".into());
        let card = render(&m, None).unwrap();
        let impp = card.find("IMPP;X-SERVICE-TYPE=Skype;type=HOME;skype:jane.doe").unwrap();
        let x = card.find("X-SKYPE:jane.doe").unwrap();
        assert!(impp < x);
    }

    #[test]
    fn unknown_services_render_as_x_lines_in_sorted_order() {
        let mut m = named_member("Jane Doe");
        m.handles.insert("zulip".into(), "jane".into());
        m.handles.insert("irc".into(), "jdoe".into());
        let card = render(&m, None).unwrap();
        let irc = card.find("X-IRC:jdoe").unwrap();
        let zulip = card.find("X-ZULIP:jane").unwrap();
        assert!(irc < zulip);
    }

    #[test]
    fn field_order_is_fixed() {
        let mut m = named_member("Jane Doe");
        m.email = Some("jane@example.com".into());
        m.phone = Some("555-1234".into());
        m.title = Some("Engineer".into());
        m.handles.insert("skype".into(), "jane.doe".into());
        let photo = Photo::new(vec![1, 2, 3], "https://img.example.com/a.png");
        let card = render(&m, Some(&photo)).unwrap();

        let positions: Vec<usize> = [
            "BEGIN:VCARD", "\nVERSION:", "\nFN:", "\nN:", "\nEMAIL;", "\nTEL;", "\nIMPP;",
            "\nX-SKYPE:", "\nTITLE:", "\nPHOTO;", "\nEND:VCARD",
        ]
        .iter()
        .map(|prefix| card.find(prefix).unwrap_or_else(|| panic!("missing {}", prefix)))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "order broken: {:?}", positions);
    }

    #[test]
    fn photo_is_base64_with_format_from_url() {
        let m = named_member("Jane Doe");
        let photo = Photo::new(vec![1, 2, 3], "https://img.example.com/a_512.png?v=2");
        let card = render(&m, Some(&photo)).unwrap();
        assert!(card.contains("PHOTO;ENCODING=b;TYPE=PNG:AQID\n"));
    }

    #[test]
    fn absent_fields_are_omitted() {
        let card = render(&named_member("Jane Doe"), None).unwrap();
        assert!(!card.contains("EMAIL"));
        assert!(!card.contains("TEL"));
        assert!(!card.contains("TITLE"));
        assert!(!card.contains("PHOTO"));
        assert!(!card.contains("IMPP"));
    }

    #[test]
    fn text_values_are_escaped() {
        let mut m = named_member("Doe; Jane, PhD");
        m.title = Some("R&D\nLead".into());
        let card = render(&m, None).unwrap();
        assert!(card.contains("FN:Doe\\; Jane\\, PhD\n"));
        assert!(card.contains("TITLE:R&D\\nLead\n"));
    }

    #[test]
    fn file_name_is_slug_of_export_name() {
        let mut m = named_member("Jane van der Doe-Smith (SRE)");
        assert_eq!(file_name(&m).unwrap(), "jane_van_der_doe_smith_sre.vcf");
        m.real_name = None;
        assert_eq!(file_name(&m).unwrap(), "jdoe.vcf");
    }

    #[test]
    fn slug_keeps_unicode_letters() {
        assert_eq!(slugify("Øyvind Åse"), "øyvind_åse");
    }

    #[test]
    fn format_from_url_variants() {
        assert_eq!(format_from_url("https://x/a.jpg"), "JPEG");
        assert_eq!(format_from_url("https://x/a.jpeg"), "JPEG");
        assert_eq!(format_from_url("https://x/a.PNG"), "PNG");
        assert_eq!(format_from_url("https://x/a.gif"), "GIF");
        assert_eq!(format_from_url("https://x/avatar"), "JPEG");
    }
}
