use regex::Regex;
use std::fmt;
use thiserror::Error;

/// A single collapsed step of an executable plan.
///
/// `Move` collapses a `Picked up ... from stack S` / `Put down ... on
/// stack D` pair into one token; `WaitRun` collapses a run of consecutive
/// waits of the same duration into a single count. Unlike the move tokens,
/// which only ever occur for the policy's default wait length, an
/// isolated wait of some other duration (the wait policy can pick less
/// than the maximum when a departure is imminent) is encoded as a
/// `WaitRun` of length 1 rather than silently dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanToken {
    Move { from: usize, to: usize },
    WaitRun { seconds_each: i64, count: u32 },
}

impl fmt::Display for PlanToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanToken::Move { from, to } => write!(f, "{from} {to}"),
            PlanToken::WaitRun {
                seconds_each,
                count,
            } if *seconds_each == 10 => write!(f, "101010 {count}"),
            PlanToken::WaitRun {
                seconds_each,
                count,
            } => write!(f, "wait {seconds_each} {count}"),
        }
    }
}

fn from_stack_index(action: &str, re: &Regex) -> Option<usize> {
    re.captures(action)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Collapses a raw action trace (one description per search step, skipping
/// the initial state's placeholder) into executable plan tokens.
pub fn encode_actions(actions: &[String]) -> Vec<PlanToken> {
    let from_re = Regex::new(r"from stack (\d+)").expect("valid regex");
    let on_re = Regex::new(r"on stack (\d+)").expect("valid regex");
    let wait_re = Regex::new(r"^Waited for (\d+) seconds$").expect("valid regex");

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < actions.len() {
        let action = &actions[i];
        if action.starts_with("Picked up") {
            if let (Some(from), Some(next)) = (from_stack_index(action, &from_re), actions.get(i + 1))
            {
                if next.starts_with("Put down") {
                    if let Some(to) = from_stack_index(next, &on_re) {
                        tokens.push(PlanToken::Move { from, to });
                        i += 2;
                        continue;
                    }
                }
            }
            i += 1;
        } else if let Some(caps) = wait_re.captures(action) {
            let seconds: i64 = caps[1].parse().expect("regex guarantees digits");
            let mut count = 1u32;
            while i + (count as usize) < actions.len() {
                let candidate = &actions[i + count as usize];
                match wait_re.captures(candidate) {
                    Some(c) if c[1].parse::<i64>().ok() == Some(seconds) => count += 1,
                    _ => break,
                }
            }
            tokens.push(PlanToken::WaitRun {
                seconds_each: seconds,
                count,
            });
            i += count as usize;
        } else {
            i += 1;
        }
    }
    tokens
}

/// Joins tokens with `;;`, mirroring the on-disk plan format's separator.
pub fn encode_plan(actions: &[String]) -> String {
    encode_actions(actions)
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(";;")
}

/// Why a persisted plan token couldn't be turned back into a `PlanToken`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanTokenError {
    #[error("malformed move token {0:?}")]
    Malformed(String),
    #[error("uninterpretable direction: stack {from} to itself")]
    UninterpretableDirection { from: usize, to: usize },
}

/// Parses one `;;`-delimited token back into a `PlanToken`: `"s d"` for a
/// move, `"101010 k"`/`"wait n k"` for a wait run. The inverse of
/// `PlanToken`'s `Display`, used to validate a plan read back from disk
/// rather than one freshly produced by `encode_actions`.
pub fn parse_token(token: &str) -> Result<PlanToken, PlanTokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(PlanTokenError::Malformed(token.to_string()));
    }

    if let Some(rest) = token.strip_prefix("101010 ") {
        let count: u32 = rest
            .trim()
            .parse()
            .map_err(|_| PlanTokenError::Malformed(token.to_string()))?;
        return Ok(PlanToken::WaitRun {
            seconds_each: 10,
            count,
        });
    }
    if let Some(rest) = token.strip_prefix("wait ") {
        let mut parts = rest.split_whitespace();
        let seconds_each: i64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PlanTokenError::Malformed(token.to_string()))?;
        let count: u32 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PlanTokenError::Malformed(token.to_string()))?;
        if parts.next().is_some() {
            return Err(PlanTokenError::Malformed(token.to_string()));
        }
        return Ok(PlanToken::WaitRun { seconds_each, count });
    }

    let mut parts = token.split_whitespace();
    let from: usize = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| PlanTokenError::Malformed(token.to_string()))?;
    let to: usize = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| PlanTokenError::Malformed(token.to_string()))?;
    if parts.next().is_some() {
        return Err(PlanTokenError::Malformed(token.to_string()));
    }
    if from == to {
        return Err(PlanTokenError::UninterpretableDirection { from, to });
    }
    Ok(PlanToken::Move { from, to })
}

/// Parses a whole `;;`-joined plan, stopping at the first malformed or
/// uninterpretable token.
pub fn parse_plan(text: &str) -> Result<Vec<PlanToken>, PlanTokenError> {
    text.split(";;")
        .filter(|s| !s.trim().is_empty())
        .map(parse_token)
        .collect()
}
