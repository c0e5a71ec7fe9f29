//! Feed a stream of requests through a limiter.
//!
//! Input is one request per line, either `<n>` (stamped with the clock) or
//! `<timestamp_ms> <n>`. Blank lines and `#` comments are skipped. Every
//! request produces one JSON decision line on the output.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::error::{Result, TollgateError};
use crate::limiters::RateLimiter;

/// One parsed input line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    pub timestamp_ms: Option<i64>,
    pub n: u64,
}

/// Outcome of a single request
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Decision {
    pub line: usize,
    pub timestamp_ms: i64,
    pub n: u64,
    pub admitted: bool,
    pub remaining: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub requests: u64,
    pub admitted: u64,
    pub rejected: u64,
    pub units_admitted: u64,
}

impl ReplaySummary {
    fn record(&mut self, decision: &Decision) {
        self.requests += 1;
        if decision.admitted {
            self.admitted += 1;
            self.units_admitted += decision.n;
        } else {
            self.rejected += 1;
        }
    }
}

/// Current unix time in milliseconds
pub fn wall_clock() -> i64 {
    Utc::now().timestamp_millis()
}

fn parse_error(line: usize, message: impl Into<String>) -> TollgateError {
    TollgateError::Parse {
        line,
        message: message.into(),
    }
}

/// Parse one input line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Request>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let (timestamp, n) = match fields.as_slice() {
        [n] => (None, *n),
        [timestamp, n] => (Some(*timestamp), *n),
        _ => {
            return Err(parse_error(
                line_no,
                "expected `<n>` or `<timestamp_ms> <n>`",
            ))
        }
    };

    let timestamp_ms = timestamp
        .map(|ts| {
            ts.parse::<i64>()
                .map_err(|_| parse_error(line_no, format!("invalid timestamp `{}`", ts)))
        })
        .transpose()?;
    let n = n.parse::<u64>().map_err(|_| {
        parse_error(
            line_no,
            format!("`{}` is not a non-negative unit count", n),
        )
    })?;

    Ok(Some(Request { timestamp_ms, n }))
}

/// Run every request in `input` through `limiter`, writing JSON decisions
/// to `output`. Requests without a timestamp are stamped with `clock`.
pub async fn replay<R, W, C>(
    limiter: &dyn RateLimiter,
    input: R,
    output: &mut W,
    clock: C,
) -> Result<ReplaySummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    C: Fn() -> i64,
{
    let mut summary = ReplaySummary::default();
    let mut lines = input.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let Some(request) = parse_line(line_no, &line)? else {
            continue;
        };
        let timestamp_ms = request.timestamp_ms.unwrap_or_else(&clock);
        let admitted = limiter.allow_n(timestamp_ms, request.n);
        let decision = Decision {
            line: line_no,
            timestamp_ms,
            n: request.n,
            admitted,
            remaining: limiter.remaining(timestamp_ms),
        };
        debug!(
            line = decision.line,
            timestamp_ms = decision.timestamp_ms,
            n = decision.n,
            admitted = decision.admitted,
            remaining = decision.remaining,
            "decision"
        );
        summary.record(&decision);

        let mut buf = serde_json::to_vec(&decision)?;
        buf.push(b'\n');
        output.write_all(&buf).await?;
    }
    output.flush().await?;

    info!(
        requests = summary.requests,
        admitted = summary.admitted,
        rejected = summary.rejected,
        units_admitted = summary.units_admitted,
        "Replay finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_line_shapes() {
        assert_eq!(
            parse_line(1, "5").unwrap(),
            Some(Request {
                timestamp_ms: None,
                n: 5
            })
        );
        assert_eq!(
            parse_line(2, "  1700000000000\t3 ").unwrap(),
            Some(Request {
                timestamp_ms: Some(1_700_000_000_000),
                n: 3
            })
        );
        assert_eq!(
            parse_line(3, "-250 0").unwrap(),
            Some(Request {
                timestamp_ms: Some(-250),
                n: 0
            })
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line(1, "").unwrap(), None);
        assert_eq!(parse_line(2, "   ").unwrap(), None);
        assert_eq!(parse_line(3, "# warmup burst").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        let err = parse_line(4, "1 2 3").unwrap_err();
        assert!(matches!(err, TollgateError::Parse { line: 4, .. }));

        let err = parse_line(5, "1000 -3").unwrap_err();
        assert!(err.to_string().contains("line 5"));
        assert!(err.to_string().contains("-3"));

        let err = parse_line(6, "soon 3").unwrap_err();
        assert!(err.to_string().contains("invalid timestamp `soon`"));
    }

    #[test]
    fn summary_counts_units() {
        let mut summary = ReplaySummary::default();
        let mut decision = Decision {
            line: 1,
            timestamp_ms: 0,
            n: 4,
            admitted: true,
            remaining: 6,
        };
        summary.record(&decision);
        decision.admitted = false;
        summary.record(&decision);
        assert_eq!(
            summary,
            ReplaySummary {
                requests: 2,
                admitted: 1,
                rejected: 1,
                units_admitted: 4,
            }
        );
    }
}
