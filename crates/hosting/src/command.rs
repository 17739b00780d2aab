use qr_core::*;
use qr_gameroom::Mode;
use qr_gameroom::Plan;

/// A quiz command typed into a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Single-answer session. `offset` (from `N-`) plays the deck in order.
    Quiz {
        speed: Speed,
        deck: String,
        limit: Option<Points>,
        offset: Option<Index>,
    },
    Multi {
        deck: String,
        limit: Option<Points>,
    },
    Scramble {
        difficulty: Difficulty,
    },
    Gauntlet {
        deck: String,
        minutes: Option<u64>,
    },
    Info {
        deck: Option<String>,
    },
    List,
    Help,
    Stop,
    Ongoing,
    Output,
    /// Re-reads the deck listing from disk.
    Reload,
}

impl Command {
    /// Parses a `kq!` command. Anything else, including unknown commands,
    /// is not a command. Malformed quiz commands fall back to the listing,
    /// malformed gauntlets to the help text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        let words = text.split_whitespace().collect::<Vec<_>>();
        let command = words.first()?.strip_prefix(COMMAND_PREFIX)?;
        let args = &words[1..];
        let command = match (command, args) {
            ("flash" | "mad" | "fast" | "quiz" | "mild" | "slow" | "qq", [deck]) => Self::Quiz {
                speed: Speed::try_from(command).ok()?,
                deck: deck.to_string(),
                limit: None,
                offset: None,
            },
            ("flash" | "mad" | "fast" | "quiz" | "mild" | "slow" | "qq", [deck, arg]) => {
                let speed = Speed::try_from(command).ok()?;
                let deck = deck.to_string();
                match arg.contains('-') {
                    true => Self::Quiz {
                        speed,
                        deck,
                        limit: None,
                        offset: Some(offset(arg)),
                    },
                    false => Self::Quiz {
                        speed,
                        deck,
                        limit: limit(arg),
                        offset: None,
                    },
                }
            }
            ("multi", [deck]) => Self::Multi {
                deck: deck.to_string(),
                limit: None,
            },
            ("multi", [deck, arg]) => Self::Multi {
                deck: deck.to_string(),
                limit: limit(arg),
            },
            ("scramble", []) => Self::Scramble {
                difficulty: Difficulty::default(),
            },
            ("scramble", [level]) => Self::Scramble {
                difficulty: Difficulty::try_from(*level).unwrap_or_default(),
            },
            ("gauntlet", [deck]) => Self::Gauntlet {
                deck: deck.to_string(),
                minutes: None,
            },
            ("gauntlet", [deck, arg]) => Self::Gauntlet {
                deck: deck.to_string(),
                minutes: Some(minutes(arg)),
            },
            ("info" | "information", []) => Self::Info { deck: None },
            ("info" | "information", args) => Self::Info {
                deck: Some(args.join(" ")),
            },
            ("flash" | "mad" | "fast" | "quiz" | "mild" | "slow" | "qq", _) => Self::List,
            ("multi" | "scramble" | "list", _) => Self::List,
            ("gauntlet", _) => Self::Help,
            ("help", _) => Self::Help,
            ("stop", _) => Self::Stop,
            ("ongoing", _) => Self::Ongoing,
            ("output", _) => Self::Output,
            ("reload", _) => Self::Reload,
            _ => return None,
        };
        Some(command)
    }
    /// Session this command asks for, if it starts one.
    pub fn plan(&self, channel: &ID<Channel>, author: &ID<Member>) -> Option<Plan> {
        let plan = match self {
            Self::Quiz {
                speed,
                deck,
                limit,
                offset,
            } => {
                let plan = Plan::new(channel.clone(), deck.as_str()).speed(*speed);
                match (offset, limit) {
                    (Some(offset), _) => plan.mode(Mode::Sequential { offset: *offset }),
                    (None, Some(limit)) => plan.win_limit(*limit),
                    (None, None) => plan,
                }
            }
            Self::Multi { deck, limit } => {
                let plan = Plan::new(channel.clone(), deck.as_str())
                    .mode(Mode::Multi)
                    .speed(Speed::Multi);
                match limit {
                    Some(limit) => plan.win_limit(*limit),
                    None => plan,
                }
            }
            Self::Scramble { difficulty } => Plan::new(channel.clone(), SCRAMBLE_TITLE)
                .mode(Mode::Scramble {
                    difficulty: *difficulty,
                }),
            Self::Gauntlet { deck, minutes } => Plan::new(channel.clone(), deck.as_str())
                .mode(Mode::Gauntlet { minutes: *minutes }),
            _ => return None,
        };
        Some(plan.host(author.clone()))
    }
    /// Commands only the owner may use.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Self::Ongoing | Self::Output | Self::Reload)
    }
}

/// Requested win limit, clamped later against the deck.
fn limit(arg: &str) -> Option<Points> {
    arg.parse().ok()
}

/// Gauntlet length as typed. Anything unparseable keeps the default clock
/// but still counts as a timed run, so it is never broadcast.
fn minutes(arg: &str) -> u64 {
    arg.parse().unwrap_or(0)
}

/// Start index from `N-`; anything unparseable starts from the top.
fn offset(arg: &str) -> Index {
    arg.split('-')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}
