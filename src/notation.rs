//! Text notation for player actions
//!
//! One action per line, case-insensitive:
//!
//! ```text
//! take ruby onyx diamond
//! take sapphire sapphire
//! take ruby, emerald discard onyx
//! reserve 1 2
//! reserve 3 deck
//! reserve 2 1 discard ruby
//! buy 2 0
//! buy reserved 1
//! ```
//!
//! Blank lines and `#` comments are ignored in scripts.

use crate::core::{Gem, Token, TokenPool};
use crate::game::{CardRef, PlayerAction};
use crate::{Result, SplendorError};

/// Parse a single action
pub fn parse_action(line: &str) -> Result<PlayerAction> {
    let lowered = line.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|word| !word.is_empty())
        .collect();

    let Some((verb, args)) = words.split_first() else {
        return Err(SplendorError::ParseError("Empty action".to_string()));
    };

    match *verb {
        "take" => parse_take(args),
        "reserve" => {
            let (target, discard) = split_discard(args);
            let action = match target {
                [tier, "deck"] => PlayerAction::reserve_from_pile(parse_index(tier, "tier")?),
                [tier, column] => PlayerAction::reserve(
                    parse_index(tier, "tier")?,
                    parse_index(column, "column")?,
                ),
                _ => {
                    return Err(SplendorError::ParseError(
                        "Expected: reserve <tier> <column> | reserve <tier> deck".to_string(),
                    ))
                }
            };
            Ok(action.with_discard(parse_discard(discard)?))
        }
        "buy" => match args {
            ["reserved", index] => Ok(PlayerAction::buy_reserved(parse_index(index, "index")?)),
            [tier, column] => Ok(PlayerAction::buy_from_shop(
                parse_index(tier, "tier")?,
                parse_index(column, "column")?,
            )),
            _ => Err(SplendorError::ParseError(
                "Expected: buy <tier> <column> | buy reserved <index>".to_string(),
            )),
        },
        other => Err(SplendorError::ParseError(format!("Unknown action: {}", other))),
    }
}

/// Words before and after a `discard` keyword
fn split_discard<'a, 'w>(args: &'a [&'w str]) -> (&'a [&'w str], &'a [&'w str]) {
    match args.iter().position(|word| *word == "discard") {
        Some(split) => (&args[..split], &args[split + 1..]),
        None => (args, &[]),
    }
}

fn parse_discard(words: &[&str]) -> Result<TokenPool> {
    let mut discarded = TokenPool::new();
    for word in words {
        let token: Token = word.parse()?;
        discarded[token] += 1;
    }
    Ok(discarded)
}

fn parse_take(args: &[&str]) -> Result<PlayerAction> {
    let (take, discard) = split_discard(args);

    let mut taken = TokenPool::new();
    for word in take {
        // Gems only: gold is never taken
        let gem: Gem = word.parse()?;
        taken[Token::from(gem)] += 1;
    }

    Ok(PlayerAction::SelectTokens {
        take: taken,
        discard: parse_discard(discard)?,
    })
}

fn parse_index(word: &str, what: &str) -> Result<usize> {
    word.parse()
        .map_err(|_| SplendorError::ParseError(format!("Invalid {}: {}", what, word)))
}

/// Parse a whole script, reporting the first bad line by number
pub fn parse_script(contents: &str) -> Result<Vec<PlayerAction>> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, strip_comment(line)))
        .filter(|(_, line)| !line.is_empty())
        .map(|(number, line)| {
            parse_action(line).map_err(|e| match e {
                SplendorError::ParseError(msg) => {
                    SplendorError::ParseError(format!("line {}: {}", number, msg))
                }
                other => SplendorError::ParseError(format!("line {}: {}", number, other)),
            })
        })
        .collect()
}

/// The line with any `#` comment removed and whitespace trimmed
pub fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or("").trim()
}

/// Render an action in the notation `parse_action` accepts
pub fn format_action(action: &PlayerAction) -> String {
    let mut out = match action {
        PlayerAction::SelectTokens { take, .. } => {
            let mut out = String::from("take");
            push_tokens(&mut out, take);
            out
        }
        PlayerAction::ReserveCard { tier, column, .. } => format!("reserve {} {}", tier, column),
        PlayerAction::ReserveFromPile { tier, .. } => format!("reserve {} deck", tier),
        PlayerAction::BuyCard(CardRef::Shop { tier, column }) => format!("buy {} {}", tier, column),
        PlayerAction::BuyCard(CardRef::Reserved { index }) => format!("buy reserved {}", index),
    };
    let discard = action.discard();
    if !discard.is_zero() {
        out.push_str(" discard");
        push_tokens(&mut out, &discard);
    }
    out
}

fn push_tokens(out: &mut String, pool: &TokenPool) {
    for (kind, count) in pool.kinds() {
        for _ in 0..count.max(0) {
            out.push(' ');
            out.push_str(kind.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_take() {
        let action = parse_action("take ruby onyx diamond").unwrap();
        assert_eq!(
            action,
            PlayerAction::take_gems(&[Gem::Ruby, Gem::Onyx, Gem::Diamond])
        );

        let action = parse_action("TAKE Sapphire,sapphire").unwrap();
        assert_eq!(
            action,
            PlayerAction::take(TokenPool::single(Token::Sapphire, 2))
        );
    }

    #[test]
    fn test_parse_take_with_discard() {
        let action = parse_action("take ruby emerald discard gold onyx").unwrap();
        let PlayerAction::SelectTokens { take, discard } = action else {
            panic!("expected a selection");
        };
        assert_eq!(take.total(), 2);
        assert_eq!(discard.gold, 1);
        assert_eq!(discard.onyx, 1);
    }

    #[test]
    fn test_gold_is_not_takeable() {
        assert!(matches!(
            parse_action("take gold"),
            Err(SplendorError::UnknownTokenKind(_))
        ));
        assert!(matches!(
            parse_action("take topaz"),
            Err(SplendorError::UnknownTokenKind(_))
        ));
    }

    #[test]
    fn test_parse_reserve_and_buy() {
        assert_eq!(
            parse_action("reserve 1 2").unwrap(),
            PlayerAction::reserve(1, 2)
        );
        assert_eq!(
            parse_action("reserve 3 deck").unwrap(),
            PlayerAction::reserve_from_pile(3)
        );
        assert_eq!(
            parse_action("reserve 2 1 discard ruby").unwrap(),
            PlayerAction::reserve(2, 1).with_discard(TokenPool::single(Token::Ruby, 1))
        );
        assert_eq!(
            parse_action("buy 2 0").unwrap(),
            PlayerAction::buy_from_shop(2, 0)
        );
        assert_eq!(
            parse_action("buy reserved 1").unwrap(),
            PlayerAction::buy_reserved(1)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_action(""), Err(SplendorError::ParseError(_))));
        assert!(matches!(parse_action("pass"), Err(SplendorError::ParseError(_))));
        assert!(matches!(parse_action("reserve x 1"), Err(SplendorError::ParseError(_))));
        assert!(matches!(parse_action("buy 1"), Err(SplendorError::ParseError(_))));
        assert!(matches!(
            parse_action("reserve discard ruby"),
            Err(SplendorError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_script_skips_comments() {
        let script = "# opening\ntake ruby onyx diamond\n\nreserve 1 0  # grab gold\n";
        let actions = parse_script(script).unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1], PlayerAction::reserve(1, 0));
    }

    #[test]
    fn test_parse_script_reports_line() {
        let err = parse_script("take ruby\nbuy nothing\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_format_is_parseable() {
        let action = PlayerAction::SelectTokens {
            take: TokenPool::single(Token::Emerald, 2),
            discard: TokenPool::single(Token::Gold, 1),
        };
        let text = format_action(&action);
        assert_eq!(text, "take emerald emerald discard gold");
        assert_eq!(parse_action(&text).unwrap(), action);

        let action =
            PlayerAction::reserve_from_pile(3).with_discard(TokenPool::single(Token::Gold, 1));
        let text = format_action(&action);
        assert_eq!(text, "reserve 3 deck discard gold");
        assert_eq!(parse_action(&text).unwrap(), action);
    }
}
