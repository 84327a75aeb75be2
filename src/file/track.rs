//! Event storage and per-track list anchors.
//!
//! Events live in a slot arena owned by the document; a freed slot goes
//! onto a free list and is reused by the next insertion. Handles are
//! plain indices, so a handle kept across a release of its event may
//! observe the reused slot — the same hazard a raw pointer would carry,
//! minus the undefined behavior.

use crate::event::{Event, EventId};

/// Head and tail anchors of one track's intrusive event list.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TrackLinks {
    pub(crate) head: Option<EventId>,
    pub(crate) tail: Option<EventId>,
}

/// Slot arena holding every event the document owns, attached or not.
#[derive(Debug, Default)]
pub(crate) struct EventArena {
    slots: Vec<Option<Event>>,
    free: Vec<u32>,
}

impl EventArena {
    pub(crate) fn insert(&mut self, event: Event) -> EventId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(event);
                EventId(index)
            }
            None => {
                self.slots.push(Some(event));
                EventId(self.slots.len() as u32 - 1)
            }
        }
    }

    pub(crate) fn get(&self, id: EventId) -> Option<&Event> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    /// Release the event's storage and recycle its slot.
    pub(crate) fn remove(&mut self, id: EventId) -> Option<Event> {
        let slot = self.slots.get_mut(id.0 as usize)?;
        let event = slot.take()?;
        self.free.push(id.0);
        Some(event)
    }

    /// Release every attached event. Detached events remain the
    /// property of whoever created them and survive.
    pub(crate) fn release_attached(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.as_ref().is_some_and(|event| event.track.is_some()) {
                *slot = None;
                self.free.push(index as u32);
            }
        }
    }
}

/// Forward iterator over one track's events, head to tail.
///
/// Returned by
/// [`MidiDocument::track_events`](crate::file::MidiDocument::track_events).
pub struct TrackEvents<'a> {
    pub(crate) arena: &'a EventArena,
    pub(crate) next: Option<EventId>,
}

impl<'a> Iterator for TrackEvents<'a> {
    type Item = (EventId, &'a Event);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let event = self.arena.get(id)?;
        self.next = event.next;
        Some((id, event))
    }
}
