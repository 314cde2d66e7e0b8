//! Scripted characters that keep each society busy.
//!
//! Static data only. The driver registers each member, joins it to its
//! society with the listed role, and then plays its lines through the same
//! entry points as any other caller.

/// A decision a cast member may propose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedAction {
    /// Action label.
    pub action: &'static str,
    /// What it is aimed at.
    pub target: &'static str,
    /// Description.
    pub description: &'static str,
}

/// A message a cast member may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedMessage {
    /// Recipient, another member of the same cast.
    pub to: &'static str,
    /// Body.
    pub content: &'static str,
}

/// One scripted character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastMember {
    /// Agent name.
    pub name: &'static str,
    /// Role taken on joining.
    pub role: &'static str,
    /// Personality descriptor.
    pub personality: &'static str,
    /// Decisions this character proposes.
    pub actions: &'static [ScriptedAction],
    /// Messages this character sends.
    pub messages: &'static [ScriptedMessage],
}

/// The cast of one society.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocietyCast {
    /// Society id.
    pub society: &'static str,
    /// Its characters.
    pub members: &'static [CastMember],
}

const fn act(
    action: &'static str,
    target: &'static str,
    description: &'static str,
) -> ScriptedAction {
    ScriptedAction {
        action,
        target,
        description,
    }
}

const fn msg(to: &'static str, content: &'static str) -> ScriptedMessage {
    ScriptedMessage { to, content }
}

/// The built-in cast for the five standard societies.
pub const STANDARD_CAST: &[SocietyCast] = &[
    SocietyCast {
        society: "rome",
        members: &[
            CastMember {
                name: "Marcus_Aurelius",
                role: "Senator",
                personality: "dignified, deliberate",
                actions: &[
                    act("Convene the Senate", "Curia", "Debate the defence of the northern frontier"),
                    act("Issue a decree", "The whole empire", "Require every province to pay the spring tax"),
                    act("Repair the arena", "Colosseum", "Restore the arena before the summer games"),
                    act("Dispatch envoys", "Greece", "Send a diplomatic mission to strengthen the alliance"),
                    act("Preside over a trial", "Roman court", "Hear a corruption case against a merchant"),
                ],
                messages: &[
                    msg("Pompey_General", "General, what news from the north? Stay watchful."),
                    msg("Crassus_Merchant", "Trade revenue is falling. What do you propose?"),
                ],
            },
            CastMember {
                name: "Pompey_General",
                role: "Military Commander",
                personality: "decisive, warlike",
                actions: &[
                    act("Patrol the frontier", "Northern border", "Lead ten thousand soldiers along the border"),
                    act("Hold military drills", "Legion camp", "Train the new recruits in formation"),
                    act("Build a fortress", "The Rhine", "Raise defensive forts along the river"),
                    act("Conscript fresh legions", "Italian towns", "Levy new soldiers for the coming campaign"),
                ],
                messages: &[
                    msg("Marcus_Aurelius", "Senator, the border is quiet, but I advise more sentries."),
                    msg("Spartacus_Rebel", "I know what you do in the shadows. Be careful."),
                ],
            },
            CastMember {
                name: "Crassus_Merchant",
                role: "Merchant",
                personality: "shrewd, profit-seeking",
                actions: &[
                    act("Pioneer an eastern trade route", "Silk Road", "Fund a new caravan route to the east"),
                    act("Trade in grain", "Ostia harbour", "Buy Egyptian grain ahead of the winter"),
                    act("Sponsor the legions", "Army supply", "Provide arms and food for the troops"),
                    act("Manage the family estates", "Hispania", "Reorganise the farmland bought last year"),
                ],
                messages: &[
                    msg("Marcus_Aurelius", "I will fund a new harbour in exchange for exclusive rights."),
                    msg("Pompey_General", "Leave the army's supplies to me, General."),
                ],
            },
            CastMember {
                name: "Spartacus_Rebel",
                role: "Plebeian Leader",
                personality: "passionate, rebellious",
                actions: &[
                    act("Protest in the Forum", "Forum Romanum", "Lead the plebs in a demonstration against taxes"),
                    act("Convene a secret meeting", "Underground tavern", "Discuss an uprising with provincial leaders"),
                    act("Rescue the poor", "The slums", "Hand out food and medicine"),
                ],
                messages: &[
                    msg("Crassus_Merchant", "Your wealth is built on the suffering of the people!"),
                    msg("Marcus_Aurelius", "Senator, the people demand fairness. Lower the taxes!"),
                ],
            },
        ],
    },
    SocietyCast {
        society: "qing",
        members: &[
            CastMember {
                name: "Kangxi_Minister",
                role: "Court Minister",
                personality: "loyal, seasoned",
                actions: &[
                    act("Submit a memorial on tax reform", "The Emperor", "Propose reform of the southern grain tax"),
                    act("Convene the Grand Secretariat", "Inner cabinet", "Discuss military affairs on the frontier"),
                    act("Receive foreign envoys", "The court", "Negotiate trade terms with Portuguese envoys"),
                ],
                messages: &[
                    msg("Jianghu_Hero", "Many rumours run through the rivers and lakes. Take care."),
                    msg("Shuijian_Sheng", "Your writing is admired across the realm. Do not waste it."),
                ],
            },
            CastMember {
                name: "Jianghu_Hero",
                role: "Wandering Swordsman",
                personality: "chivalrous, loyal",
                actions: &[
                    act("Attack a corrupt official's convoy", "Southern waterways", "Seize goods taken from the people"),
                    act("Rescue a merchant", "Suzhou streets", "Drive off the thugs harassing a trader"),
                    act("Convene the martial sects", "Wudang Mountain", "Invite every sect master to a gathering"),
                ],
                messages: &[msg(
                    "Kangxi_Minister",
                    "Minister, word is that someone is colluding with foreign powers.",
                )],
            },
            CastMember {
                name: "Shuijian_Sheng",
                role: "Scholar",
                personality: "refined, truth-seeking",
                actions: &[
                    act("Found a private academy", "Hangzhou", "Open a school for the children of the poor"),
                    act("Sit the imperial examination", "Beijing examination hall", "Take the spring examination"),
                    act("Hold public lectures", "Southern academy", "Lecture on the classics to all comers"),
                ],
                messages: &[msg(
                    "Kangxi_Minister",
                    "Minister, the people's minds are restless. Learning can steady them.",
                )],
            },
        ],
    },
    SocietyCast {
        society: "cybertron",
        members: &[
            CastMember {
                name: "Optimus_AI",
                role: "AI Leader",
                personality: "rational, fair",
                actions: &[
                    act("Launch a reconstruction project", "Core district", "Rebuild the planet's central district"),
                    act("Convene the AI council", "AI central", "Review new research programmes"),
                    act("Construct an interstellar relay", "Orbit", "Deploy a new generation of relay satellites"),
                    act("Manage energy distribution", "Whole planet", "Rebalance power so every sector is served"),
                ],
                messages: &[
                    msg("Commander_Kira", "The AI side will cooperate on reconstruction. Let the past rest."),
                    msg("Tech_Radical", "Progress cannot come at the cost of stability."),
                ],
            },
            CastMember {
                name: "Commander_Kira",
                role: "Human Government Official",
                personality: "pragmatic, cautious",
                actions: &[
                    act("Convene parliament", "Human assembly", "Debate the cooperation accord with the AI council"),
                    act("Patrol the colonies", "Human settlements", "Deploy new security systems in the colonies"),
                    act("Dispatch a negotiator", "Stellar League", "Negotiate Cybertron's standing in the league"),
                ],
                messages: &[msg(
                    "Optimus_AI",
                    "Humans need their own space. Cooperation, yes, with clear borders.",
                )],
            },
            CastMember {
                name: "Tech_Radical",
                role: "Tech Radical",
                personality: "zealous, inventive",
                actions: &[
                    act("Build an energy weapon", "Secret lab", "Develop a new class of energy weapon"),
                    act("Attack the data centre", "Stellar data hub", "Break into the league's data centre"),
                    act("Test nanotech", "Abandoned factory", "Run dangerous nanotechnology experiments"),
                ],
                messages: &[msg(
                    "Optimus_AI",
                    "Your fairness is an illusion. Real power lies in breakthroughs!",
                )],
            },
        ],
    },
    SocietyCast {
        society: "future_city",
        members: &[
            CastMember {
                name: "Governor_Nova",
                role: "City Governor",
                personality: "rigorous, far-sighted",
                actions: &[
                    act("Issue a governance decree", "Whole city", "Announce a new energy rationing plan"),
                    act("Manage smart traffic", "Transit hub", "Switch on the next-generation traffic system"),
                    act("Dispatch a delegation", "Satellite cities", "Strengthen the alliance with nearby cities"),
                ],
                messages: &[
                    msg("Shadow_Boss", "The committee has noticed your people. Rein them in."),
                    msg("Dr_Mara", "How is the outbreak spreading? Do we need stricter controls?"),
                ],
            },
            CastMember {
                name: "Shadow_Boss",
                role: "Underground Boss",
                personality: "cunning, ruthless",
                actions: &[
                    act("Trade in contraband", "Service tunnels", "Move rare minerals through the tunnels"),
                    act("Attack a research convoy", "Research institute", "Seize an energy researcher's prototype"),
                    act("Hold a black-market auction", "Derelict zone", "Auction smuggled goods"),
                ],
                messages: &[msg(
                    "Governor_Nova",
                    "Governor, your rules are a paper wall. The city needs flexible people.",
                )],
            },
            CastMember {
                name: "Dr_Mara",
                role: "Medical Officer",
                personality: "kind, professional",
                actions: &[
                    act("Manage a health survey", "Low-income district", "Screen residents for the new virus"),
                    act("Found a research clinic", "Medical lab", "Develop a treatment for the new strain"),
                    act("Rescue the injured", "Emergency centre", "Treat casualties from the tunnel incident"),
                ],
                messages: &[msg(
                    "Governor_Nova",
                    "Governor, the clinics in the poor districts are out of supplies.",
                )],
            },
        ],
    },
    SocietyCast {
        society: "ancient_japan",
        members: &[
            CastMember {
                name: "Lord_Nobunaga",
                role: "Daimyo",
                personality: "ambitious, decisive",
                actions: &[
                    act("Attack the Asai domain", "Asai lands", "Lead the army against the Asai clan"),
                    act("Build a castle", "Azuchi", "Raise a magnificent new castle at Azuchi"),
                    act("Trade for firearms", "Portuguese merchants", "Negotiate for western muskets"),
                ],
                messages: &[msg("Hanzo_Ninja", "Hanzo, watch the Takeda clan for me.")],
            },
            CastMember {
                name: "Hanzo_Ninja",
                role: "Ninja",
                personality: "secretive, loyal",
                actions: &[
                    act("Patrol enemy lands", "Takeda lands", "Slip into Takeda territory to scout"),
                    act("Dispatch intelligence", "Oda headquarters", "Report enemy movements to the Oda"),
                    act("Train new ninja", "Hidden village", "Train the next generation of ninja"),
                ],
                messages: &[msg(
                    "Lord_Nobunaga",
                    "My lord, the Takeda are secretly courting the Uesugi. We must act.",
                )],
            },
            CastMember {
                name: "Merchant_Takeda",
                role: "Merchant",
                personality: "shrewd, smooth",
                actions: &[
                    act("Manage the rice market", "Edo rice market", "Buy up grain while the war lasts"),
                    act("Sponsor the daimyo", "Oda clan", "Supply the Oda army for the campaign"),
                    act("Pioneer maritime trade", "Ming China", "Open a maritime trade route with Ming merchants"),
                ],
                messages: &[msg(
                    "Lord_Nobunaga",
                    "Lord Oda, I can supply ample rations, though I would ask for something in return.",
                )],
            },
        ],
    },
];

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use std::collections::HashSet;

    use agora_ledger::{DEFAULT_KEYWORD, RuleBook};

    use super::*;
    use crate::catalog::standard_societies;

    #[test]
    fn every_cast_role_is_in_its_catalog() {
        let societies = standard_societies();
        for cast in STANDARD_CAST {
            let society = societies
                .iter()
                .find(|s| s.id.as_str() == cast.society)
                .unwrap();
            for member in cast.members {
                assert!(
                    society.has_role(member.role),
                    "{} is not a role of {}",
                    member.role,
                    cast.society
                );
            }
        }
    }

    #[test]
    fn messages_stay_within_the_cast() {
        for cast in STANDARD_CAST {
            let names: HashSet<&str> = cast.members.iter().map(|m| m.name).collect();
            for member in cast.members {
                assert!(!member.actions.is_empty());
                for message in member.messages {
                    assert!(names.contains(message.to), "{} -> {}", member.name, message.to);
                    assert_ne!(message.to, member.name);
                }
            }
        }
    }

    #[test]
    fn most_scripted_actions_hit_a_rule() {
        let rules = RuleBook::standard();
        let (hit, total) = STANDARD_CAST
            .iter()
            .flat_map(|c| c.members)
            .flat_map(|m| m.actions)
            .fold((0_usize, 0_usize), |(hit, total), a| {
                let matched = rules.lookup(a.action).keyword != DEFAULT_KEYWORD;
                (hit + usize::from(matched), total + 1)
            });
        assert!(hit * 4 >= total * 3, "only {hit} of {total} actions match a rule");
    }

    #[test]
    fn scripted_actions_settle_under_their_intended_rule() {
        let rules = RuleBook::standard();
        let labels: HashSet<&str> = STANDARD_CAST
            .iter()
            .flat_map(|c| c.members)
            .flat_map(|m| m.actions)
            .map(|a| a.action)
            .collect();
        for (label, keyword) in [
            ("Preside over a trial", "trial"),
            ("Manage the rice market", "manage"),
            ("Repair the arena", "repair"),
            ("Pioneer maritime trade", "trade"),
            ("Hold military drills", "hold"),
        ] {
            assert!(labels.contains(label), "{label} is not scripted");
            assert_eq!(rules.lookup(label).keyword, keyword, "{label}");
        }
    }
}
