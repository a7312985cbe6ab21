use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::outline::Outline;
use crate::resolver::{Resolution, ResolutionRequest, Resolver, SelectionChange};

/// Event session over stdio: one JSON request (or array of requests) per
/// input line, one JSON event per resolution that changes something.
pub fn run(outline: &Outline) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(outline, stdin.lock(), &mut stdout.lock())
}

/// One input line is one resolution cycle.
pub fn serve(outline: &Outline, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    let mut resolver = Resolver::new(outline);

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let cycle: Cycle = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("bad request line: {e}");
                write_event(out, &Event::Error {
                    message: format!("parse error: {e}"),
                })?;
                continue;
            }
        };

        let resolution = match cycle {
            Cycle::One(request) => resolver.resolve(request),
            Cycle::Many(requests) => resolver.resolve_cycle(requests),
        };

        match resolution {
            Resolution::Unchanged => {}
            Resolution::Selected(change) => write_event(out, &Event::Selected(change))?,
            Resolution::NavScrollReset => write_event(out, &Event::NavScrollReset)?,
        }
    }

    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Cycle {
    One(ResolutionRequest),
    Many(Vec<ResolutionRequest>),
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum Event {
    Selected(SelectionChange),
    NavScrollReset,
    Error { message: String },
}

fn write_event(w: &mut impl Write, event: &Event) -> io::Result<()> {
    serde_json::to_writer(&mut *w, event)?;
    w.write_all(b"\n")?;
    w.flush()
}
