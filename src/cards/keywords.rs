//! Keyword mechanics as explicit typed fields.
//!
//! Keywords live in two places: printed on a `CardDefinition`, and as the
//! working set on a `CardInstance` that overlay recalculation rebuilds
//! from the printed base plus active grants. Numeric keywords (Resist,
//! Challenger) stack additively; threshold keywords (Singer, Shift, Sing
//! Together) keep the best value.

use serde::{Deserialize, Serialize};

/// The working keyword set of a card.
///
/// ## Example
///
/// ```
/// use glimmer_engine::cards::Keywords;
///
/// let kw = Keywords::default().evasive().with_resist(2);
/// assert!(kw.evasive);
/// assert_eq!(kw.resist, 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keywords {
    /// Only Evasive attackers may challenge this card.
    pub evasive: bool,
    /// May challenge (and sing) the turn it is played.
    pub rush: bool,
    /// Cannot quest while a legal challenge exists.
    pub reckless: bool,
    /// Opponents cannot choose this card with effects (challenges excepted).
    pub ward: bool,
    /// While exerted, opposing challenges must target Bodyguards.
    pub bodyguard: bool,
    /// Questing lends this card's strength to another character.
    pub support: bool,
    /// Incoming damage is reduced by this amount.
    pub resist: i64,
    /// Bonus strength while this card is the attacker in a challenge.
    pub challenger: i64,
    /// Sings songs as though this card cost at least N ink.
    pub singer: Option<i64>,
    /// May be played on top of a same-name character for N ink.
    pub shift: Option<i64>,
    /// May be sung by two characters with summed value at least N.
    pub sing_together: Option<i64>,
}

impl Keywords {
    /// Builder: mark Evasive.
    #[must_use]
    pub fn evasive(mut self) -> Self {
        self.evasive = true;
        self
    }

    /// Builder: mark Rush.
    #[must_use]
    pub fn rush(mut self) -> Self {
        self.rush = true;
        self
    }

    /// Builder: mark Reckless.
    #[must_use]
    pub fn reckless(mut self) -> Self {
        self.reckless = true;
        self
    }

    /// Builder: mark Ward.
    #[must_use]
    pub fn ward(mut self) -> Self {
        self.ward = true;
        self
    }

    /// Builder: mark Bodyguard.
    #[must_use]
    pub fn bodyguard(mut self) -> Self {
        self.bodyguard = true;
        self
    }

    /// Builder: mark Support.
    #[must_use]
    pub fn support(mut self) -> Self {
        self.support = true;
        self
    }

    /// Builder: set Resist N.
    #[must_use]
    pub fn with_resist(mut self, amount: i64) -> Self {
        self.resist = amount;
        self
    }

    /// Builder: set Challenger +N.
    #[must_use]
    pub fn with_challenger(mut self, amount: i64) -> Self {
        self.challenger = amount;
        self
    }

    /// Builder: set Singer N.
    #[must_use]
    pub fn with_singer(mut self, value: i64) -> Self {
        self.singer = Some(value);
        self
    }

    /// Builder: set Shift N.
    #[must_use]
    pub fn with_shift(mut self, cost: i64) -> Self {
        self.shift = Some(cost);
        self
    }

    /// Builder: set Sing Together N.
    #[must_use]
    pub fn with_sing_together(mut self, value: i64) -> Self {
        self.sing_together = Some(value);
        self
    }

    /// Merge a granted keyword into the working set.
    pub fn apply(&mut self, grant: &KeywordGrant) {
        match grant {
            KeywordGrant::Evasive => self.evasive = true,
            KeywordGrant::Rush => self.rush = true,
            KeywordGrant::Reckless => self.reckless = true,
            KeywordGrant::Ward => self.ward = true,
            KeywordGrant::Bodyguard => self.bodyguard = true,
            KeywordGrant::Support => self.support = true,
            KeywordGrant::Resist(n) => self.resist += n,
            KeywordGrant::Challenger(n) => self.challenger += n,
            KeywordGrant::Singer(n) => {
                self.singer = Some(self.singer.map_or(*n, |cur| cur.max(*n)));
            }
        }
    }
}

/// A keyword granted by a continuous effect or static ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeywordGrant {
    Evasive,
    Rush,
    Reckless,
    Ward,
    Bodyguard,
    Support,
    Resist(i64),
    Challenger(i64),
    Singer(i64),
}

impl std::fmt::Display for KeywordGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeywordGrant::Evasive => write!(f, "Evasive"),
            KeywordGrant::Rush => write!(f, "Rush"),
            KeywordGrant::Reckless => write!(f, "Reckless"),
            KeywordGrant::Ward => write!(f, "Ward"),
            KeywordGrant::Bodyguard => write!(f, "Bodyguard"),
            KeywordGrant::Support => write!(f, "Support"),
            KeywordGrant::Resist(n) => write!(f, "Resist +{n}"),
            KeywordGrant::Challenger(n) => write!(f, "Challenger +{n}"),
            KeywordGrant::Singer(n) => write!(f, "Singer {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let kw = Keywords::default()
            .evasive()
            .ward()
            .with_resist(1)
            .with_singer(5);

        assert!(kw.evasive);
        assert!(kw.ward);
        assert!(!kw.rush);
        assert_eq!(kw.resist, 1);
        assert_eq!(kw.singer, Some(5));
        assert_eq!(kw.shift, None);
    }

    #[test]
    fn test_resist_stacks() {
        let mut kw = Keywords::default().with_resist(1);
        kw.apply(&KeywordGrant::Resist(2));
        assert_eq!(kw.resist, 3);
    }

    #[test]
    fn test_challenger_stacks() {
        let mut kw = Keywords::default();
        kw.apply(&KeywordGrant::Challenger(2));
        kw.apply(&KeywordGrant::Challenger(1));
        assert_eq!(kw.challenger, 3);
    }

    #[test]
    fn test_singer_keeps_best() {
        let mut kw = Keywords::default().with_singer(4);
        kw.apply(&KeywordGrant::Singer(3));
        assert_eq!(kw.singer, Some(4));
        kw.apply(&KeywordGrant::Singer(6));
        assert_eq!(kw.singer, Some(6));
    }

    #[test]
    fn test_flag_grants() {
        let mut kw = Keywords::default();
        kw.apply(&KeywordGrant::Evasive);
        kw.apply(&KeywordGrant::Bodyguard);
        assert!(kw.evasive);
        assert!(kw.bodyguard);
    }

    #[test]
    fn test_serialization() {
        let kw = Keywords::default().rush().with_challenger(2);
        let json = serde_json::to_string(&kw).unwrap();
        let deserialized: Keywords = serde_json::from_str(&json).unwrap();
        assert_eq!(kw, deserialized);
    }
}
