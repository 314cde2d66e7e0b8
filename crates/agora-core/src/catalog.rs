//! Built-in societies.

use agora_types::{Genre, PressProfile, Society, SocietyId};

struct Entry {
    id: &'static str,
    name: &'static str,
    genre: Genre,
    era: &'static str,
    description: &'static str,
    rules: &'static str,
    roles: &'static [&'static str],
    title: &'static str,
    masthead: &'static str,
    reporters: &'static [&'static str],
}

const STANDARD: &[Entry] = &[
    Entry {
        id: "rome",
        name: "Roman Empire",
        genre: Genre::Historical,
        era: "2nd century AD",
        description: "An empire at the height of its reach, held together by the Senate, \
                      the legions and the grain ships.",
        rules: "Decisions pass through public judgment. Military action costs dearly; \
                civic works raise prosperity.",
        roles: &[
            "Senator",
            "Military Commander",
            "Merchant",
            "Plebeian Leader",
            "Priest",
            "Gladiator",
        ],
        title: "Roma Gazette",
        masthead: "ROMA GAZETTE",
        reporters: &["Classical Chronicler", "Field Correspondent", "Market Columnist"],
    },
    Entry {
        id: "qing",
        name: "Qing Dynasty",
        genre: Genre::Historical,
        era: "Kangxi reign, late 17th century",
        description: "A vast court of ministers and examinations, with the rivers and \
                      martial sects of the south beyond its reach.",
        rules: "Memorials go to the throne; the realm judges. Learning and order are \
                rewarded; unrest is not.",
        roles: &[
            "Court Minister",
            "Wandering Swordsman",
            "Scholar",
            "Provincial Governor",
            "Salt Merchant",
        ],
        title: "Qing Court Bulletin",
        masthead: "QING COURT BULLETIN",
        reporters: &["Court Herald", "Rivers-and-Lakes Informant", "Village Correspondent"],
    },
    Entry {
        id: "cybertron",
        name: "Cybertron",
        genre: Genre::SciFi,
        era: "Post-war reconstruction",
        description: "A machine world rebuilding after a long war, shared uneasily by \
                      artificial minds and human colonists.",
        rules: "The AI council and the human government must both live with every \
                decision. Reckless experiments carry risk.",
        roles: &[
            "AI Leader",
            "Human Government Official",
            "Tech Radical",
            "Engineer",
            "Smuggler",
        ],
        title: "Cybertron Daily",
        masthead: "CYBERTRON DAILY",
        reporters: &["AI News Network", "Human Press Union", "Independent Broadcaster"],
    },
    Entry {
        id: "future_city",
        name: "Nova City",
        genre: Genre::SciFi,
        era: "22nd century",
        description: "A smart megacity of rationed energy and automated traffic, with \
                      an underground economy beneath every street.",
        rules: "The governance committee sets policy; the city votes with its feet. \
                Public health and infrastructure build prosperity.",
        roles: &[
            "City Governor",
            "Underground Boss",
            "Medical Officer",
            "Data Broker",
            "Courier",
        ],
        title: "Nova Times",
        masthead: "NOVA TIMES",
        reporters: &["Smart Editor", "Underground Source", "Health Desk"],
    },
    Entry {
        id: "ancient_japan",
        name: "Sengoku Japan",
        genre: Genre::Historical,
        era: "Warring States period",
        description: "Rival daimyo contend for the realm while ninja, monks and \
                      merchants play every side.",
        rules: "Lords command, the provinces judge. War drains treasuries; castles \
                and trade raise the realm.",
        roles: &["Daimyo", "Ninja", "Merchant", "Samurai", "Monk"],
        title: "Sengoku Chronicle",
        masthead: "SENGOKU CHRONICLE",
        reporters: &["Court Scribe", "Ninja Network", "Travelling Trader"],
    },
];

fn to_society(entry: &Entry) -> Society {
    Society {
        id: SocietyId::new(entry.id),
        name: entry.name.to_owned(),
        genre: entry.genre,
        era: entry.era.to_owned(),
        description: entry.description.to_owned(),
        rules: entry.rules.to_owned(),
        roles: entry.roles.iter().map(|r| (*r).to_owned()).collect(),
        press: PressProfile {
            title: entry.title.to_owned(),
            masthead: entry.masthead.to_owned(),
            reporters: entry.reporters.iter().map(|r| (*r).to_owned()).collect(),
        },
    }
}

/// The five built-in societies, in display order.
pub fn standard_societies() -> Vec<Society> {
    STANDARD.iter().map(to_society).collect()
}
