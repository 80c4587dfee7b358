// src/display.rs

//! Console rendering of the displayed state.

use std::io::Write;

use tokio::sync::watch;
use tokio_stream::{StreamExt, wrappers::WatchStream};

use crate::session::VerificationState;

/// One status line, e.g. `SUBJECT IDENTIFIED: ALICE [MATCH 0.73]`.
pub fn status_line(state: &VerificationState) -> String {
    let tag = match (state.is_match(), state.confidence()) {
        (true, Some(c)) => format!("MATCH {c:.2}"),
        (true, None) => "MATCH".to_string(),
        (false, _) => "NO MATCH".to_string(),
    };
    format!("SUBJECT IDENTIFIED: {} [{}]", state.identity_label(), tag)
}

/// Print a line whenever what the operator would see changes.
/// Returns once the loop (the sending side) is gone.
pub async fn render<W: Write>(rx: watch::Receiver<VerificationState>, mut out: W) {
    let mut updates = WatchStream::new(rx);
    let mut last: Option<VerificationState> = None;

    while let Some(state) = updates.next().await {
        if last.as_ref().is_some_and(|prev| prev.same_display(&state)) {
            continue;
        }
        if writeln!(out, "{}", status_line(&state)).and_then(|_| out.flush()).is_err() {
            break;
        }
        last = Some(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::OrderingPolicy, session::StateBoard};

    #[test]
    fn formats_match_and_sentinels() {
        assert_eq!(
            status_line(&VerificationState::scanning()),
            "SUBJECT IDENTIFIED: SCANNING... [NO MATCH]"
        );
        assert_eq!(
            status_line(&VerificationState::matched(1, "ALICE".into(), Some(0.734))),
            "SUBJECT IDENTIFIED: ALICE [MATCH 0.73]"
        );
        assert_eq!(
            status_line(&VerificationState::unreachable(2)),
            "SUBJECT IDENTIFIED: OFFLINE (Check Backend) [NO MATCH]"
        );
    }

    #[tokio::test]
    async fn repeats_of_the_same_label_are_printed_once() {
        let board = StateBoard::new(OrderingPolicy::LatestIssued);
        let rx = board.subscribe();
        let mut out = Vec::new();

        let printer = async {
            render(rx, &mut out).await;
        };
        let feeder = async {
            for seq in 1..=3 {
                board.publish(VerificationState::matched(seq, "ALICE".into(), None));
                tokio::task::yield_now().await;
            }
            board.publish(VerificationState::unmatched(4));
            tokio::task::yield_now().await;
            drop(board);
        };
        tokio::join!(printer, feeder);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "SUBJECT IDENTIFIED: SCANNING... [NO MATCH]",
                "SUBJECT IDENTIFIED: ALICE [MATCH]",
                "SUBJECT IDENTIFIED: UNKNOWN [NO MATCH]",
            ]
        );
    }
}
