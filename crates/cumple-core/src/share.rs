//! Deep links for sending a greeting through messaging apps.

use serde::Serialize;

use crate::person::Person;

/// Links for sharing one message with one person. Phone-based links are
/// absent when the person has no phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
  pub whatsapp: String,
  pub telegram: String,
  pub sms:      Option<String>,
  pub call:     Option<String>,
  pub email:    Option<String>,
}

/// Strip the punctuation people type into phone numbers.
fn dial_string(phone: &str) -> String {
  phone
    .chars()
    .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
    .collect()
}

pub fn share_links(person: &Person, message: &str) -> ShareLinks {
  let text = urlencoding::encode(message);
  let phone = person
    .phone
    .as_deref()
    .map(dial_string)
    .filter(|p| !p.is_empty());

  let whatsapp = match &phone {
    Some(p) => format!("https://wa.me/{p}?text={text}"),
    None => format!("https://wa.me/?text={text}"),
  };

  let email = (!person.email.trim().is_empty()).then(|| {
    let subject = format!("🎉 Happy birthday {}!", person.name);
    format!(
      "mailto:{}?subject={}&body={text}",
      person.email.trim(),
      urlencoding::encode(&subject)
    )
  });

  ShareLinks {
    whatsapp,
    telegram: format!("https://t.me/share/url?text={text}"),
    sms: phone.as_ref().map(|p| format!("sms:{p}?body={text}")),
    call: phone.as_ref().map(|p| format!("tel:{p}")),
    email,
  }
}
