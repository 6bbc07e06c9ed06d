//! Templated greeting messages.
//!
//! Template choice is deterministic: callers pass a `variant` index, which
//! wraps around the templates available for the requested kind and tone.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreetingKind {
  #[default]
  Birthday,
  Anniversary,
  Congratulations,
  ThankYou,
  /// Free text supplied by the caller.
  Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
  #[default]
  Friendly,
  Formal,
  Funny,
  Emotional,
  Professional,
}

/// Placeholder used when the recipient has no name.
const NAME_PLACEHOLDER: &str = "[Name]";

const BIRTHDAY_FRIENDLY: &[&str] = &[
  "Happy birthday {name}! 🎉 I hope you have an amazing day full of joy, surprises and special moments. May all your wishes come true! 🎂✨",
  "Today is your special day, {name}! 🎈 May this new year of life bring you happiness, success and wonderful adventures. Enjoy every moment! 🎊",
  "Happy birthday {name}! 🎁 You are an incredible person and you deserve all the happiness in the world. Have a fantastic day! 🌟",
];

const BIRTHDAY_FORMAL: &[&str] = &[
  "Dear {name}, I wish you a very happy birthday. May this new year of life bring you prosperity, health and many blessings. My best wishes on your special day.",
  "On this special day, please accept my sincere congratulations on your birthday, {name}. May you enjoy a day full of joy with your loved ones.",
];

const BIRTHDAY_FUNNY: &[&str] = &[
  "Happy birthday {name}! 🎂 Another year wiser... or so we hope! 😄 Have a day full of laughs, cake and zero adult responsibilities. Let's celebrate! 🎉",
  "Hey {name}! 🎈 It's your birthday, so you officially have permission to act like you're five again. Bring on the confetti and cake! 🍰✨",
];

const BIRTHDAY_EMOTIONAL: &[&str] = &[
  "Happy birthday {name}. Having you in my life is a gift, and today I celebrate everything you are. May this year hold you gently. 💖",
];

const BIRTHDAY_PROFESSIONAL: &[&str] = &[
  "Happy birthday, {name}. Wishing you a successful and rewarding year ahead, both personally and professionally.",
];

const ANNIVERSARY_FRIENDLY: &[&str] = &[
  "Happy anniversary {name}! 💕 May you keep writing a story full of love, laughter and unforgettable moments together. Celebrate this special day! 🥂",
  "How wonderful to celebrate another year of love and companionship! Happy anniversary {name}. May your love keep growing stronger every day. 💖",
];

const CONGRATULATIONS_FRIENDLY: &[&str] = &[
  "Congratulations {name}! 🎊 Your effort and dedication have paid off. You deserve all the success coming your way. Keep shining! ⭐",
  "So proud to see you reach your goals, {name}! 🏆 Your achievements are inspiring. Celebrate this moment, you've earned it! 🎉",
];

const THANK_YOU_FRIENDLY: &[&str] = &[
  "Thank you so much, {name}! 🙏 Your kindness means a lot and I'm lucky to have you around. 💛",
];

/// Templates for a kind and tone. Empty when the combination has none.
fn templates(kind: GreetingKind, tone: Tone) -> &'static [&'static str] {
  match (kind, tone) {
    (GreetingKind::Birthday, Tone::Friendly) => BIRTHDAY_FRIENDLY,
    (GreetingKind::Birthday, Tone::Formal) => BIRTHDAY_FORMAL,
    (GreetingKind::Birthday, Tone::Funny) => BIRTHDAY_FUNNY,
    (GreetingKind::Birthday, Tone::Emotional) => BIRTHDAY_EMOTIONAL,
    (GreetingKind::Birthday, Tone::Professional) => BIRTHDAY_PROFESSIONAL,
    (GreetingKind::Anniversary, Tone::Friendly) => ANNIVERSARY_FRIENDLY,
    (GreetingKind::Congratulations, Tone::Friendly) => CONGRATULATIONS_FRIENDLY,
    (GreetingKind::ThankYou, Tone::Friendly) => THANK_YOU_FRIENDLY,
    _ => &[],
  }
}

/// Parameters for [`compose`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GreetingRequest {
  #[serde(default)]
  pub kind:    GreetingKind,
  #[serde(default)]
  pub tone:    Tone,
  /// Index into the matching templates; wraps around.
  #[serde(default)]
  pub variant: usize,
  /// Required for [`GreetingKind::Custom`], ignored otherwise.
  pub prompt:  Option<String>,
}

/// Render a greeting for `name`.
///
/// Kinds and tones without templates fall back to a friendly birthday
/// message. A custom greeting with a blank prompt fails with
/// [`Error::EmptyPrompt`].
pub fn compose(name: Option<&str>, request: &GreetingRequest) -> Result<String> {
  let name = name
    .map(str::trim)
    .filter(|n| !n.is_empty())
    .unwrap_or(NAME_PLACEHOLDER);

  if request.kind == GreetingKind::Custom {
    let prompt = request
      .prompt
      .as_deref()
      .map(str::trim)
      .filter(|p| !p.is_empty())
      .ok_or(Error::EmptyPrompt)?;
    return Ok(format!("Personalized message for {name}: {prompt}"));
  }

  let mut pool = templates(request.kind, request.tone);
  if pool.is_empty() {
    pool = BIRTHDAY_FRIENDLY;
  }
  let template = pool[request.variant % pool.len()];
  Ok(template.replace("{name}", name))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request(kind: GreetingKind, tone: Tone, variant: usize) -> GreetingRequest {
    GreetingRequest { kind, tone, variant, prompt: None }
  }

  #[test]
  fn fills_in_the_name() {
    let msg = compose(Some("Ana"), &request(GreetingKind::Birthday, Tone::Formal, 0)).unwrap();
    assert!(msg.starts_with("Dear Ana,"), "{msg}");
  }

  #[test]
  fn missing_name_uses_placeholder() {
    let msg = compose(None, &GreetingRequest::default()).unwrap();
    assert!(msg.contains("[Name]"), "{msg}");
    let msg = compose(Some("  "), &GreetingRequest::default()).unwrap();
    assert!(msg.contains("[Name]"), "{msg}");
  }

  #[test]
  fn variant_wraps_around() {
    let a = compose(Some("Ana"), &request(GreetingKind::Birthday, Tone::Funny, 0)).unwrap();
    let b = compose(Some("Ana"), &request(GreetingKind::Birthday, Tone::Funny, 2)).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn unknown_combination_falls_back_to_friendly_birthday() {
    let msg = compose(Some("Ana"), &request(GreetingKind::Anniversary, Tone::Funny, 0)).unwrap();
    assert_eq!(msg, BIRTHDAY_FRIENDLY[0].replace("{name}", "Ana"));
  }

  #[test]
  fn custom_needs_prompt() {
    let mut req = request(GreetingKind::Custom, Tone::Friendly, 0);
    assert_eq!(compose(Some("Ana"), &req), Err(Error::EmptyPrompt));

    req.prompt = Some("see you at the party".into());
    assert_eq!(
      compose(Some("Ana"), &req).unwrap(),
      "Personalized message for Ana: see you at the party"
    );
  }

  #[test]
  fn every_template_mentions_the_name() {
    let kinds = [
      GreetingKind::Birthday,
      GreetingKind::Anniversary,
      GreetingKind::Congratulations,
      GreetingKind::ThankYou,
    ];
    let tones = [Tone::Friendly, Tone::Formal, Tone::Funny, Tone::Emotional, Tone::Professional];
    for kind in kinds {
      for tone in tones {
        for t in templates(kind, tone) {
          assert!(t.contains("{name}"), "{kind:?}/{tone:?}: {t}");
        }
      }
    }
  }
}
