//! The society gazette: a pure projection of recent events into articles.
//!
//! Nothing here is random. Headline template and byline are picked from
//! the event's sequence number, so the same events always print the same
//! paper. Message content is never quoted; the gazette is public and
//! messages are not.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use agora_ledger::settlement::round_for_display;
use agora_types::{
    Article, DecisionDetails, Digest, DigestId, Editorial, Event, EventPayload, JoinDetails,
    MessageDetails, Society,
};

/// Events considered per digest.
pub const DIGEST_WINDOW: usize = 10;

/// Maximum articles per digest.
pub const MAX_ARTICLES: usize = 5;

const ACCEPTED_HEADLINES: &[&str] = &[
    "{agent}'s \"{action}\" wins the society's approval!",
    "Major decision: {agent} pushes \"{action}\" through",
    "Hot topic: {agent}'s \"{action}\" draws wide attention",
    "Bulletin: {agent}'s \"{action}\" carried",
];

const REJECTED_HEADLINES: &[&str] = &[
    "{agent}'s \"{action}\" meets public doubt",
    "Point of contention: {agent}'s \"{action}\" voted down",
    "Street talk: {agent}'s \"{action}\" shelved",
];

const MESSAGE_HEADLINES: &[&str] = &[
    "{from} sends word to {to}; the diplomatic mood turns delicate",
    "{from} and {to} open talks, drawing attention from all sides",
];

const JOIN_HEADLINES: &[&str] = &[
    "New face! {agent} enters as \"{role}\"",
    "{agent} formally joins, taking the post of \"{role}\"",
];

/// Pick an entry by sequence number.
fn pick<'a>(options: &[&'a str], seq: u64) -> &'a str {
    let len = u64::try_from(options.len()).unwrap_or(1).max(1);
    usize::try_from(seq.checked_rem(len).unwrap_or(0))
        .ok()
        .and_then(|i| options.get(i).copied())
        .unwrap_or_default()
}

fn signed(value: i64) -> String {
    if value >= 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

/// The headline for an event.
pub fn headline(event: &Event) -> String {
    match &event.payload {
        EventPayload::Decision(d) => {
            let templates = if d.accepted {
                ACCEPTED_HEADLINES
            } else {
                REJECTED_HEADLINES
            };
            pick(templates, event.seq)
                .replace("{agent}", d.agent.as_str())
                .replace("{action}", &d.action)
        }
        EventPayload::Message(m) => pick(MESSAGE_HEADLINES, event.seq)
            .replace("{from}", m.from.as_str())
            .replace("{to}", m.to.as_str()),
        EventPayload::Join(j) => pick(JOIN_HEADLINES, event.seq)
            .replace("{agent}", j.agent.as_str())
            .replace("{role}", &j.role),
    }
}

fn decision_body(d: &DecisionDetails) -> String {
    let mut body = if d.description.trim().is_empty() {
        format!("{} proposed \"{}\"", d.agent, d.action)
    } else {
        d.description.trim_end_matches('.').to_owned()
    };
    if d.accepted {
        let reception = if d.dice_roll >= 5 {
            "welcomed it warmly"
        } else {
            "accepted it with caution"
        };
        body.push_str(&format!(
            ". The die showed {}; the society {reception}.",
            d.dice_roll
        ));
    } else {
        body.push_str(&format!(
            ". The die showed only {}; the proposal failed to win support.",
            d.dice_roll
        ));
    }
    if let Some(economy) = &d.economy {
        body.push_str(&format!(
            " Economic impact: balance {}, prosperity {}.",
            signed(economy.display.balance_change),
            signed(economy.display.prosperity_change)
        ));
    }
    body
}

fn message_body(m: &MessageDetails) -> String {
    format!(
        "Word is that {} recently sent {} a message of some importance. \
         Observers suspect deeper political currents.",
        m.from, m.to
    )
}

fn join_body(j: &JoinDetails) -> String {
    format!(
        "{} has formally joined the society as \"{}\". All sides await the newcomer with interest.",
        j.agent, j.role
    )
}

/// The article for one event.
pub fn article(society: &Society, event: &Event) -> Article {
    let body = match &event.payload {
        EventPayload::Decision(d) => decision_body(d),
        EventPayload::Message(m) => message_body(m),
        EventPayload::Join(j) => join_body(j),
    };
    let reporters: Vec<&str> = society.press.reporters.iter().map(String::as_str).collect();
    let reporter = match pick(&reporters, event.seq) {
        "" => "Staff reporter",
        name => name,
    };
    Article {
        headline: headline(event),
        body,
        reporter: reporter.to_owned(),
        timestamp: event.timestamp,
        event_id: event.id,
    }
}

/// The editorial for a set of events: acceptance rate of the decisions
/// among them, in percent (50 when there are none).
pub fn editorial<'a>(events: impl IntoIterator<Item = &'a Event>) -> Editorial {
    let (total, accepted) = crate::evolution::EvolutionScorer::tally(events);
    let rate = if total == 0 {
        50
    } else {
        let pct = Decimal::from(accepted)
            .saturating_mul(Decimal::ONE_HUNDRED)
            .checked_div(Decimal::from(total))
            .unwrap_or(Decimal::ZERO);
        u8::try_from(round_for_display(pct).clamp(0, 100)).unwrap_or(50)
    };
    let content = if rate >= 70 {
        "The society has settled of late. Most proposals pass, and the factions seem to have reached an understanding."
    } else if rate >= 40 {
        "The situation is hard to read. Proposals pass and fail in turn while the factions keep maneuvering."
    } else {
        "Turbulent times. Most proposals are met with suspicion and the political order stands on dangerous ground."
    };
    Editorial {
        title: "From the Editors".to_owned(),
        content: content.to_owned(),
        acceptance_rate: rate,
    }
}

/// Produce the gazette for `society` from its most recent events.
///
/// Only the last [`DIGEST_WINDOW`] events are considered; the first
/// [`MAX_ARTICLES`] of those become articles, oldest first.
pub fn generate(society: &Society, recent: &[Event], now: DateTime<Utc>) -> Digest {
    let window = recent
        .get(recent.len().saturating_sub(DIGEST_WINDOW)..)
        .unwrap_or_default();
    let articles = window
        .iter()
        .take(MAX_ARTICLES)
        .map(|e| article(society, e))
        .collect();
    Digest {
        id: DigestId::new(format!("digest_{}_{}", society.id, now.timestamp_millis())),
        society: society.id.clone(),
        title: society.press.title.clone(),
        masthead: society.press.masthead.clone(),
        date: now.format("%Y-%m-%d").to_string(),
        articles,
        editorial: editorial(window),
        generated_at: now,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use agora_events::EventLog;
    use agora_types::{AgentName, EconomicImpact, ImpactDisplay, Judgment, SocietyId};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog;

    fn rome() -> Society {
        catalog::standard_societies()
            .into_iter()
            .find(|s| s.id.as_str() == "rome")
            .unwrap()
    }

    fn decision(agent: &str, action: &str, dice: u8, economy: Option<EconomicImpact>) -> EventPayload {
        let judgment = Judgment::from_dice(dice);
        EventPayload::Decision(DecisionDetails {
            agent: AgentName::from(agent),
            action: action.to_owned(),
            target: None,
            description: String::new(),
            dice_roll: dice,
            accepted: judgment.accepted(),
            judgment,
            verdict: judgment.verdict().to_owned(),
            economy,
        })
    }

    fn impact() -> EconomicImpact {
        EconomicImpact {
            agent: AgentName::from("Marcus"),
            society: SocietyId::from("rome"),
            rule: "conscript".to_owned(),
            balance_delta: dec!(-45),
            balance: dec!(455),
            prosperity_delta: dec!(-2.5),
            prosperity: dec!(47.5),
            display: ImpactDisplay {
                balance_change: -45,
                new_balance: 455,
                prosperity_change: -2,
                new_prosperity: 48,
            },
        }
    }

    #[test]
    fn rejected_decision_article_reports_die_and_impact() {
        let mut log = EventLog::new(SocietyId::from("rome"));
        let event = log.append(
            decision("Marcus", "Conscript legions", 2, Some(impact())),
            Utc::now(),
        );
        let article = article(&rome(), &event);
        assert_eq!(article.headline, "Marcus's \"Conscript legions\" meets public doubt");
        assert!(article.body.contains("The die showed only 2"));
        assert!(article.body.contains("balance -45, prosperity -2."));
        assert_eq!(article.event_id, event.id);
        assert!(rome().press.reporters.contains(&article.reporter));
    }

    #[test]
    fn message_articles_do_not_quote_content() {
        let mut log = EventLog::new(SocietyId::from("rome"));
        let event = log.append(
            EventPayload::Message(MessageDetails {
                from: AgentName::from("Marcus"),
                to: AgentName::from("Pompey"),
                content: "The secret password is eagle".to_owned(),
            }),
            Utc::now(),
        );
        let article = article(&rome(), &event);
        assert!(!article.body.contains("eagle"));
        assert!(article.headline.contains("Marcus"));
    }

    #[test]
    fn digest_takes_first_five_of_last_ten() {
        let mut log = EventLog::new(SocietyId::from("rome"));
        let now = Utc::now();
        for i in 0..12_u8 {
            let dice = if i % 2 == 0 { 6 } else { 1 };
            log.append(decision("Marcus", &format!("Convene {i}"), dice, None), now);
        }
        let events = log.tail(50);
        let digest = generate(&rome(), &events, now);

        assert_eq!(digest.articles.len(), MAX_ARTICLES);
        assert_eq!(digest.articles[0].event_id, events[2].id);
        assert_eq!(digest.articles[4].event_id, events[6].id);
        assert_eq!(digest.editorial.acceptance_rate, 50);
        assert!(digest.editorial.content.starts_with("The situation is hard to read"));
        assert_eq!(
            digest.id.as_str(),
            format!("digest_rome_{}", now.timestamp_millis())
        );
        assert_eq!(digest.title, rome().press.title);
    }

    #[test]
    fn digest_is_deterministic() {
        let mut log = EventLog::new(SocietyId::from("rome"));
        let now = Utc::now();
        log.append(decision("Marcus", "Build a forum", 5, None), now);
        log.append(decision("Pompey", "Attack Gaul", 3, None), now);
        let events = log.tail(10);
        assert_eq!(generate(&rome(), &events, now), generate(&rome(), &events, now));
    }

    #[test]
    fn editorial_thresholds() {
        let mut log = EventLog::new(SocietyId::from("rome"));
        let now = Utc::now();
        assert_eq!(editorial(log.iter()).acceptance_rate, 50);

        for _ in 0..7 {
            log.append(decision("Marcus", "Trade", 6, None), now);
        }
        for _ in 0..3 {
            log.append(decision("Marcus", "Trade", 1, None), now);
        }
        let stable = editorial(log.iter());
        assert_eq!(stable.acceptance_rate, 70);
        assert!(stable.content.starts_with("The society has settled"));

        let mut grim = EventLog::new(SocietyId::from("rome"));
        for _ in 0..3 {
            grim.append(decision("Marcus", "Trade", 1, None), now);
        }
        assert_eq!(editorial(grim.iter()).acceptance_rate, 0);
        assert!(editorial(grim.iter()).content.starts_with("Turbulent times"));
    }

    #[test]
    fn empty_society_prints_an_empty_paper() {
        let digest = generate(&rome(), &[], Utc::now());
        assert!(digest.articles.is_empty());
        assert_eq!(digest.editorial.acceptance_rate, 50);
    }
}
