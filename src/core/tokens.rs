//! Token currency: gem colors, the gold wildcard, and pools of both

use crate::{Result, SplendorError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Every kind of token that can sit in the bank or a player's holdings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Token {
    Gold,
    Ruby,
    Emerald,
    Sapphire,
    Diamond,
    Onyx,
}

impl Token {
    pub const ALL: [Token; 6] = [
        Token::Gold,
        Token::Ruby,
        Token::Emerald,
        Token::Sapphire,
        Token::Diamond,
        Token::Onyx,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Token::Gold => "gold",
            Token::Ruby => "ruby",
            Token::Emerald => "emerald",
            Token::Sapphire => "sapphire",
            Token::Diamond => "diamond",
            Token::Onyx => "onyx",
        }
    }

    /// The gem color of this token, or `None` for gold
    pub fn as_gem(self) -> Option<Gem> {
        match self {
            Token::Gold => None,
            Token::Ruby => Some(Gem::Ruby),
            Token::Emerald => Some(Gem::Emerald),
            Token::Sapphire => Some(Gem::Sapphire),
            Token::Diamond => Some(Gem::Diamond),
            Token::Onyx => Some(Gem::Onyx),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Token {
    type Err = SplendorError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        Token::ALL
            .into_iter()
            .find(|token| token.name() == lowered)
            .ok_or_else(|| SplendorError::UnknownTokenKind(s.to_string()))
    }
}

/// The five gem colors: what a card produces and what costs are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gem {
    Ruby,
    Emerald,
    Sapphire,
    Diamond,
    Onyx,
}

impl Gem {
    pub const ALL: [Gem; 5] = [Gem::Ruby, Gem::Emerald, Gem::Sapphire, Gem::Diamond, Gem::Onyx];

    pub fn name(self) -> &'static str {
        Token::from(self).name()
    }
}

impl From<Gem> for Token {
    fn from(gem: Gem) -> Self {
        match gem {
            Gem::Ruby => Token::Ruby,
            Gem::Emerald => Token::Emerald,
            Gem::Sapphire => Token::Sapphire,
            Gem::Diamond => Token::Diamond,
            Gem::Onyx => Token::Onyx,
        }
    }
}

impl TryFrom<Token> for Gem {
    type Error = SplendorError;

    fn try_from(token: Token) -> Result<Self> {
        token
            .as_gem()
            .ok_or_else(|| SplendorError::UnknownTokenKind(token.name().to_string()))
    }
}

impl fmt::Display for Gem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gem {
    type Err = SplendorError;

    fn from_str(s: &str) -> Result<Self> {
        Gem::try_from(s.parse::<Token>()?)
    }
}

/// Component-wise arithmetic shared by both pool shapes
macro_rules! impl_pool_arithmetic {
    ($pool:ident { $($field:ident),+ }) => {
        impl Add for $pool {
            type Output = $pool;

            fn add(self, other: $pool) -> $pool {
                $pool { $($field: self.$field + other.$field),+ }
            }
        }

        impl Sub for $pool {
            type Output = $pool;

            fn sub(self, other: $pool) -> $pool {
                $pool { $($field: self.$field - other.$field),+ }
            }
        }

        impl Neg for $pool {
            type Output = $pool;

            fn neg(self) -> $pool {
                $pool { $($field: -self.$field),+ }
            }
        }

        impl AddAssign for $pool {
            fn add_assign(&mut self, other: $pool) {
                $(self.$field += other.$field;)+
            }
        }

        impl SubAssign for $pool {
            fn sub_assign(&mut self, other: $pool) {
                $(self.$field -= other.$field;)+
            }
        }

        impl $pool {
            /// Sum of all counts
            pub fn total(&self) -> i32 {
                0 $(+ self.$field)+
            }

            /// True iff no count is negative
            pub fn is_nonnegative(&self) -> bool {
                true $(&& self.$field >= 0)+
            }

            /// True iff every count is zero
            pub fn is_zero(&self) -> bool {
                true $(&& self.$field == 0)+
            }
        }
    };
}

/// Six-kind pool: the community bank and every player's holdings
///
/// Counts are signed so that a subtraction used for a legality check can go
/// negative; holdings are only ever committed after `is_nonnegative()` holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPool {
    pub gold: i32,
    pub ruby: i32,
    pub emerald: i32,
    pub sapphire: i32,
    pub diamond: i32,
    pub onyx: i32,
}

impl_pool_arithmetic!(TokenPool { gold, ruby, emerald, sapphire, diamond, onyx });

impl TokenPool {
    pub fn new() -> Self {
        TokenPool::default()
    }

    /// A pool holding `amount` of a single kind
    pub fn single(kind: Token, amount: i32) -> Self {
        let mut pool = TokenPool::new();
        pool[kind] = amount;
        pool
    }

    /// Build a pool from gem counts plus a gold count
    pub fn from_gems(gems: GemPool, gold: i32) -> Self {
        TokenPool {
            gold,
            ruby: gems.ruby,
            emerald: gems.emerald,
            sapphire: gems.sapphire,
            diamond: gems.diamond,
            onyx: gems.onyx,
        }
    }

    /// Build a pool from a list of tokens, one count per occurrence
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut pool = TokenPool::new();
        for &token in tokens {
            pool[token] += 1;
        }
        pool
    }

    /// The gem part of this pool (gold dropped)
    pub fn gems(&self) -> GemPool {
        GemPool {
            ruby: self.ruby,
            emerald: self.emerald,
            sapphire: self.sapphire,
            diamond: self.diamond,
            onyx: self.onyx,
        }
    }

    pub fn count(&self, kind: Token) -> i32 {
        self[kind]
    }

    /// Look up a count by token name
    pub fn count_by_name(&self, name: &str) -> Result<i32> {
        Ok(self[name.parse::<Token>()?])
    }

    /// Iterate over `(kind, count)` for every kind, in `Token::ALL` order
    pub fn kinds(&self) -> impl Iterator<Item = (Token, i32)> + '_ {
        Token::ALL.into_iter().map(move |kind| (kind, self[kind]))
    }

    /// Best-effort transfer out of this pool
    ///
    /// For every kind with a positive request, moves `min(available, requested)`
    /// into the returned pool. Never fails; the result says what actually moved.
    pub fn pull(&mut self, request: &TokenPool) -> TokenPool {
        let mut result = TokenPool::new();
        for (kind, requested) in request.kinds() {
            if requested <= 0 {
                continue;
            }
            let moved = requested.min(self[kind].max(0));
            result[kind] = moved;
            self[kind] -= moved;
        }
        result
    }

    /// Exact transfer out of this pool
    ///
    /// Checks every kind before touching anything, so a failure leaves the pool
    /// unchanged.
    pub fn pull_exact(&mut self, request: &TokenPool) -> Result<TokenPool> {
        let shortfall: i32 = request
            .kinds()
            .map(|(kind, requested)| (requested - self[kind]).max(0))
            .sum();
        if shortfall > 0 {
            return Err(SplendorError::InsufficientFunds { shortfall });
        }
        Ok(self.pull(request))
    }
}

impl Index<Token> for TokenPool {
    type Output = i32;

    fn index(&self, kind: Token) -> &i32 {
        match kind {
            Token::Gold => &self.gold,
            Token::Ruby => &self.ruby,
            Token::Emerald => &self.emerald,
            Token::Sapphire => &self.sapphire,
            Token::Diamond => &self.diamond,
            Token::Onyx => &self.onyx,
        }
    }
}

impl IndexMut<Token> for TokenPool {
    fn index_mut(&mut self, kind: Token) -> &mut i32 {
        match kind {
            Token::Gold => &mut self.gold,
            Token::Ruby => &mut self.ruby,
            Token::Emerald => &mut self.emerald,
            Token::Sapphire => &mut self.sapphire,
            Token::Diamond => &mut self.diamond,
            Token::Onyx => &mut self.onyx,
        }
    }
}

impl fmt::Display for TokenPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_counts(f, self.kinds().map(|(kind, count)| (kind.name(), count)))
    }
}

/// Five-kind pool: card costs and a player's production from owned cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GemPool {
    pub ruby: i32,
    pub emerald: i32,
    pub sapphire: i32,
    pub diamond: i32,
    pub onyx: i32,
}

impl_pool_arithmetic!(GemPool { ruby, emerald, sapphire, diamond, onyx });

impl GemPool {
    pub fn new() -> Self {
        GemPool::default()
    }

    pub fn count(&self, gem: Gem) -> i32 {
        self[gem]
    }

    /// Look up a count by token kind; gold is outside this pool's domain
    pub fn try_count(&self, kind: Token) -> Result<i32> {
        Ok(self[Gem::try_from(kind)?])
    }

    /// Look up a count by gem name
    pub fn count_by_name(&self, name: &str) -> Result<i32> {
        Ok(self[name.parse::<Gem>()?])
    }

    pub fn kinds(&self) -> impl Iterator<Item = (Gem, i32)> + '_ {
        Gem::ALL.into_iter().map(move |gem| (gem, self[gem]))
    }
}

impl Index<Gem> for GemPool {
    type Output = i32;

    fn index(&self, gem: Gem) -> &i32 {
        match gem {
            Gem::Ruby => &self.ruby,
            Gem::Emerald => &self.emerald,
            Gem::Sapphire => &self.sapphire,
            Gem::Diamond => &self.diamond,
            Gem::Onyx => &self.onyx,
        }
    }
}

impl IndexMut<Gem> for GemPool {
    fn index_mut(&mut self, gem: Gem) -> &mut i32 {
        match gem {
            Gem::Ruby => &mut self.ruby,
            Gem::Emerald => &mut self.emerald,
            Gem::Sapphire => &mut self.sapphire,
            Gem::Diamond => &mut self.diamond,
            Gem::Onyx => &mut self.onyx,
        }
    }
}

impl fmt::Display for GemPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_counts(f, self.kinds().map(|(gem, count)| (gem.name(), count)))
    }
}

/// Writes `name=count` pairs, skipping zeroes; an all-zero pool prints as `-`
fn write_counts<'a>(
    f: &mut fmt::Formatter<'_>,
    counts: impl Iterator<Item = (&'a str, i32)>,
) -> fmt::Result {
    let mut wrote_any = false;
    for (name, count) in counts.filter(|(_, count)| *count != 0) {
        if wrote_any {
            write!(f, " ")?;
        }
        write!(f, "{}={}", name, count)?;
        wrote_any = true;
    }
    if !wrote_any {
        write!(f, "-")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> TokenPool {
        TokenPool {
            gold: 5,
            ruby: 4,
            emerald: 4,
            sapphire: 4,
            diamond: 4,
            onyx: 4,
        }
    }

    #[test]
    fn test_token_parsing() {
        assert_eq!("ruby".parse::<Token>().unwrap(), Token::Ruby);
        assert_eq!(" Gold ".parse::<Token>().unwrap(), Token::Gold);
        assert!(matches!(
            "jade".parse::<Token>(),
            Err(SplendorError::UnknownTokenKind(_))
        ));
        assert!(matches!(
            "gold".parse::<Gem>(),
            Err(SplendorError::UnknownTokenKind(_))
        ));
    }

    #[test]
    fn test_pull_is_best_effort() {
        let mut pool = TokenPool::single(Token::Ruby, 1);
        let pulled = pool.pull(&TokenPool::single(Token::Ruby, 3));

        assert_eq!(pulled.ruby, 1);
        assert_eq!(pool.ruby, 0);
    }

    #[test]
    fn test_pull_conserves_tokens() {
        let mut source = bank();
        let before = source.total();
        let request = TokenPool {
            gold: 7,
            ruby: 1,
            onyx: 2,
            ..TokenPool::default()
        };

        let pulled = source.pull(&request);
        assert_eq!(before, source.total() + pulled.total());
        assert_eq!(pulled.gold, 5);
        assert_eq!(pulled.onyx, 2);
        assert!(source.is_nonnegative());
    }

    #[test]
    fn test_pull_ignores_non_positive_requests() {
        let mut source = bank();
        let pulled = source.pull(&TokenPool {
            ruby: -2,
            ..TokenPool::default()
        });
        assert!(pulled.is_zero());
        assert_eq!(source, bank());
    }

    #[test]
    fn test_pull_exact_checks_every_kind_first() {
        let mut source = bank();
        let request = TokenPool {
            ruby: 1,
            gold: 6,
            ..TokenPool::default()
        };

        let result = source.pull_exact(&request);
        assert!(matches!(
            result,
            Err(SplendorError::InsufficientFunds { shortfall: 1 })
        ));
        // Nothing moved, not even the ruby that was available
        assert_eq!(source, bank());

        let pulled = source
            .pull_exact(&TokenPool::single(Token::Ruby, 4))
            .unwrap();
        assert_eq!(pulled.ruby, 4);
        assert_eq!(source.ruby, 0);
    }

    #[test]
    fn test_arithmetic_and_sign() {
        let a = TokenPool::single(Token::Ruby, 2);
        let b = TokenPool::single(Token::Onyx, 1);

        let sum = a + b;
        assert_eq!(sum.total(), 3);

        let diff = b - a;
        assert_eq!(diff.ruby, -2);
        assert!(!diff.is_nonnegative());
        assert_eq!(-diff, a - b);

        let mut acc = TokenPool::new();
        acc += a;
        acc -= b;
        assert_eq!(acc.ruby, 2);
        assert_eq!(acc.onyx, -1);
    }

    #[test]
    fn test_gem_pool_domain() {
        let cost = GemPool {
            ruby: 3,
            ..GemPool::default()
        };
        assert_eq!(cost.try_count(Token::Ruby).unwrap(), 3);
        assert!(matches!(
            cost.try_count(Token::Gold),
            Err(SplendorError::UnknownTokenKind(_))
        ));
        assert_eq!(cost.count_by_name("ruby").unwrap(), 3);
        assert!(cost.count_by_name("gold").is_err());
        assert_eq!(bank().count_by_name("gold").unwrap(), 5);
    }

    #[test]
    fn test_display() {
        let pool = TokenPool::from_tokens(&[Token::Ruby, Token::Onyx, Token::Ruby]);
        assert_eq!(pool.to_string(), "ruby=2 onyx=1");
        assert_eq!(TokenPool::new().to_string(), "-");
    }
}
