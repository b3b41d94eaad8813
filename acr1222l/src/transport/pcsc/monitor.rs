// acr1222l-rs/acr1222l/src/transport/pcsc/monitor.rs

use std::collections::HashSet;
use std::ffi::CString;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, trace, warn};
use pcsc::{Context, PNP_NOTIFICATION, ReaderState as PcscReaderState, State};

use crate::event::{EventSender, ReaderEvent};
use crate::types::ReaderState;

/// Monitor loop. Runs until `running` is cleared, the context is
/// cancelled, or the event receiver goes away.
pub(super) fn run(ctx: Context, events: EventSender, running: Arc<AtomicBool>, interval: Duration) {
    let mut known: HashSet<CString> = HashSet::new();
    let mut states = vec![PcscReaderState::new(PNP_NOTIFICATION(), State::UNAWARE)];

    if !refresh_readers(&ctx, &events, &mut known, &mut states) {
        return;
    }

    while running.load(Ordering::SeqCst) {
        match ctx.get_status_change(Some(interval), &mut states) {
            Ok(()) => {}
            Err(pcsc::Error::Timeout) => continue,
            Err(pcsc::Error::Cancelled) => break,
            Err(pcsc::Error::UnknownReader) | Err(pcsc::Error::ReaderUnavailable) => {
                // a reader vanished between list and wait
                if !refresh_readers(&ctx, &events, &mut known, &mut states) {
                    break;
                }
                continue;
            }
            Err(e) => {
                warn!("pcsc status change failed: {}", e);
                let _ = events.send(ReaderEvent::ServiceError {
                    message: e.to_string(),
                });
                break;
            }
        }

        let mut readers_changed = false;
        for rs in &mut states {
            let event_state = rs.event_state();
            if !event_state.contains(State::CHANGED) {
                continue;
            }
            if rs.name() == PNP_NOTIFICATION() {
                readers_changed = true;
            } else if event_state.intersects(State::UNKNOWN | State::UNAVAILABLE) {
                readers_changed = true;
            } else {
                let name = rs.name().to_string_lossy().into_owned();
                let state = ReaderState::from_bits(event_state.bits() as u32);
                trace!("status change on {}: {:#06x}", name, state.bits());
                if events
                    .send(ReaderEvent::StatusChanged { name, state })
                    .is_err()
                {
                    return;
                }
            }
            rs.sync_current_state();
        }

        if readers_changed && !refresh_readers(&ctx, &events, &mut known, &mut states) {
            break;
        }
    }
    debug!("pcsc monitor loop exited");
}

/// Diff the reader list against `known`, emit Attached/Removed and rebuild
/// the watched state list. Returns false when the receiver is gone.
fn refresh_readers(
    ctx: &Context,
    events: &EventSender,
    known: &mut HashSet<CString>,
    states: &mut Vec<PcscReaderState>,
) -> bool {
    let current: HashSet<CString> = match ctx.list_readers_owned() {
        Ok(list) => list.into_iter().collect(),
        Err(pcsc::Error::NoReadersAvailable) => HashSet::new(),
        Err(e) => {
            return events
                .send(ReaderEvent::ServiceError {
                    message: e.to_string(),
                })
                .is_ok();
        }
    };

    for gone in known.difference(&current) {
        let name = gone.to_string_lossy().into_owned();
        if events.send(ReaderEvent::Removed { name }).is_err() {
            return false;
        }
    }
    for new in current.difference(known) {
        let name = new.to_string_lossy().into_owned();
        if events.send(ReaderEvent::Attached { name }).is_err() {
            return false;
        }
    }

    states.retain(|rs| rs.name() == PNP_NOTIFICATION() || current.contains(rs.name()));
    for new in current.difference(known) {
        states.push(PcscReaderState::new(new.clone(), State::UNAWARE));
    }
    *known = current;
    true
}
