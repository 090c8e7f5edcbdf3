//! Graph builder: slot table -> value
//!
//! Each slot moves through
//!
//! ```text
//! Unvisited -> Pending -> Provisional -> Final
//!                 ^ tagged slots only, while their init data is decoded
//! ```
//!
//! Lists and mappings are allocated as soon as they are entered, so they are
//! `Provisional` before any child is decoded. A tagged slot only becomes
//! `Provisional` once its init decoder has returned; that object is what
//! later references (including ones inside its own final data) resolve to.
//! A reference to a `Pending` slot has no object to point at and fails as
//! malformed.
//!
//! On success every object built stays in the heap, including the `[key,
//! value]` pair lists mappings are read from. On failure the heap is rolled
//! back to where it was.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::registry::{DecoderEntry, DecoderRegistry};
use slotgraph_core::{Heap, Mapping, ObjRef, Object, Value};
use slotgraph_wire::markers::{classify, Leader};
use slotgraph_wire::{latin1_decode, Entry, SlotTable, WireAlphabet};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone)]
enum State {
    Unvisited,
    Pending,
    Provisional(Value),
    Final(Value),
}

enum Frame<'t, 'r> {
    Seq {
        slot: usize,
        obj: ObjRef,
        items: &'t [Entry],
        pos: usize,
        out: Vec<Value>,
    },
    Map {
        slot: usize,
        obj: ObjRef,
        pairs: &'t [Entry],
        pos: usize,
    },
    Ext {
        slot: usize,
        tag: &'t str,
        codec: &'r DecoderEntry,
        init: usize,
        finish: Option<usize>,
        object: Option<Value>,
        finished: bool,
    },
}

enum Need {
    Slot(usize),
    Done,
}

enum Demand<'t, 'r> {
    Ready(Value),
    Enter(Frame<'t, 'r>),
}

fn scalar_value(entry: &Entry) -> Option<Value> {
    match entry {
        Entry::Null => Some(Value::Null),
        Entry::Bool(b) => Some(Value::Bool(*b)),
        Entry::Int(i) => Some(Value::Int(*i)),
        Entry::Float(f) => Some(Value::Float(*f)),
        _ => None,
    }
}

impl<'t, 'r> Frame<'t, 'r> {
    fn slot(&self) -> usize {
        match self {
            Frame::Seq { slot, .. } | Frame::Map { slot, .. } | Frame::Ext { slot, .. } => *slot,
        }
    }

    /// Next slot this frame is waiting on, copying inline scalars as it goes
    fn next(&mut self) -> Result<Need> {
        match self {
            Frame::Seq {
                slot,
                items,
                pos,
                out,
                ..
            } => {
                while let Some(item) = items.get(*pos) {
                    if let Some(value) = scalar_value(item) {
                        out.push(value);
                        *pos += 1;
                        continue;
                    }
                    return match item.as_reference() {
                        Some(target) => Ok(Need::Slot(target)),
                        None => Err(Error::malformed(
                            *slot,
                            format!(
                                "element {} must be a scalar or a [slot] reference, found {}",
                                pos,
                                item.type_name()
                            ),
                        )),
                    };
                }
                Ok(Need::Done)
            }
            Frame::Map { slot, pairs, pos, .. } => match pairs.get(*pos) {
                Some(entry) => entry.as_index().map(Need::Slot).ok_or_else(|| {
                    Error::malformed(
                        *slot,
                        format!("mapping entry {} must be a slot index", pos),
                    )
                }),
                None => Ok(Need::Done),
            },
            Frame::Ext {
                init,
                finish,
                object,
                finished,
                ..
            } => Ok(match (object, finish) {
                (None, _) => Need::Slot(*init),
                (Some(_), Some(f)) if !*finished => Need::Slot(*f),
                _ => Need::Done,
            }),
        }
    }
}

/// Per-call decode state
struct Build<'t, 'r, 'h> {
    table: &'t [Entry],
    registry: &'r DecoderRegistry,
    alphabet: WireAlphabet,
    heap: &'h mut Heap,
    states: Vec<State>,
    stack: Vec<Frame<'t, 'r>>,
}

impl<'t, 'r, 'h> Build<'t, 'r, 'h> {
    fn run(mut self) -> Result<Value> {
        if self.table.is_empty() {
            return Err(Error::EmptyTable);
        }

        match self.demand(0, 0)? {
            Demand::Ready(value) => return Ok(value),
            Demand::Enter(frame) => self.stack.push(frame),
        }

        while let Some(mut frame) = self.stack.pop() {
            loop {
                match frame.next()? {
                    Need::Done => {
                        self.complete(frame)?;
                        break;
                    }
                    Need::Slot(target) => match self.demand(frame.slot(), target)? {
                        Demand::Ready(value) => self.accept(&mut frame, value)?,
                        Demand::Enter(child) => {
                            self.stack.push(frame);
                            self.stack.push(child);
                            break;
                        }
                    },
                }
            }
        }

        match &self.states[0] {
            State::Final(value) => Ok(value.clone()),
            _ => Err(Error::malformed(0, "root slot did not finish decoding")),
        }
    }

    /// Value of `target`, as needed by slot `from`
    fn demand(&mut self, from: usize, target: usize) -> Result<Demand<'t, 'r>> {
        match self.states.get(target) {
            None => Err(Error::malformed(
                from,
                format!(
                    "reference to slot {} is out of bounds ({} slots)",
                    target,
                    self.table.len()
                ),
            )),
            Some(State::Provisional(value)) | Some(State::Final(value)) => {
                Ok(Demand::Ready(value.clone()))
            }
            Some(State::Pending) => Err(Error::malformed(
                from,
                format!("slot {} is referenced before its init decoder ran", target),
            )),
            Some(State::Unvisited) => self.start(target),
        }
    }

    fn start(&mut self, slot: usize) -> Result<Demand<'t, 'r>> {
        let table = self.table;
        let entry = &table[slot];

        if let Some(value) = scalar_value(entry) {
            self.states[slot] = State::Final(value.clone());
            return Ok(Demand::Ready(value));
        }

        let items = match entry {
            Entry::Str(s) => {
                let value = self.pass_through(slot, s)?;
                self.states[slot] = State::Final(value.clone());
                return Ok(Demand::Ready(value));
            }
            Entry::Seq(items) => items.as_slice(),
            _ => return Err(Error::malformed(slot, "unexpected payload")),
        };

        match items.first() {
            Some(Entry::Str(leader)) => match classify(leader) {
                Leader::Mapping => {
                    let obj = self
                        .heap
                        .alloc(Object::Map(Mapping::with_capacity(items.len() - 1)));
                    self.states[slot] = State::Provisional(Value::Ref(obj));
                    Ok(Demand::Enter(Frame::Map {
                        slot,
                        obj,
                        pairs: &items[1..],
                        pos: 0,
                    }))
                }
                Leader::Tag(tag) => self.start_ext(slot, tag, &items[1..]),
                Leader::Unreserved => Err(Error::malformed(
                    slot,
                    format!("leading string {:?} is not a reserved marker", leader),
                )),
            },
            _ => {
                let obj = self.heap.alloc(Object::List(Vec::new()));
                self.states[slot] = State::Provisional(Value::Ref(obj));
                Ok(Demand::Enter(Frame::Seq {
                    slot,
                    obj,
                    items,
                    pos: 0,
                    out: Vec::with_capacity(items.len()),
                }))
            }
        }
    }

    fn start_ext(
        &mut self,
        slot: usize,
        tag: &'t str,
        rest: &'t [Entry],
    ) -> Result<Demand<'t, 'r>> {
        if rest.is_empty() || rest.len() > 2 {
            return Err(Error::malformed(
                slot,
                format!(
                    "tagged payload must have 2 or 3 elements, found {}",
                    rest.len() + 1
                ),
            ));
        }

        let codec = self
            .registry
            .lookup(tag)
            .ok_or_else(|| Error::UnknownTag {
                slot,
                tag: tag.to_string(),
            })?;

        let index = |entry: &Entry, what: &str| {
            entry
                .as_index()
                .ok_or_else(|| Error::malformed(slot, format!("{} must be a slot index", what)))
        };
        let init = index(&rest[0], "init data")?;
        let finish = match rest.get(1) {
            None => None,
            Some(entry) => {
                if codec.finish.is_none() {
                    return Err(Error::malformed(
                        slot,
                        format!("tag {:?} has no finalizer but final data is present", tag),
                    ));
                }
                Some(index(entry, "final data")?)
            }
        };

        self.states[slot] = State::Pending;
        Ok(Demand::Enter(Frame::Ext {
            slot,
            tag,
            codec,
            init,
            finish,
            object: None,
            finished: false,
        }))
    }

    fn accept(&mut self, frame: &mut Frame<'t, 'r>, value: Value) -> Result<()> {
        match frame {
            Frame::Seq { out, pos, .. } => {
                out.push(value);
                *pos += 1;
            }
            Frame::Map {
                slot,
                obj,
                pos,
                ..
            } => {
                let (key, val) = match value.as_obj().and_then(|r| self.heap.list(r)) {
                    Some([key, val]) => (key.clone(), val.clone()),
                    _ => {
                        return Err(Error::malformed(
                            *slot,
                            format!("mapping entry {} is not a [key, value] pair", pos),
                        ))
                    }
                };
                if let Some(map) = self.heap.map_mut(*obj) {
                    map.insert(key, val);
                }
                *pos += 1;
            }
            Frame::Ext {
                slot,
                tag,
                codec,
                object,
                finished,
                ..
            } => match object {
                None => {
                    trace!("Slot {}: init {:?}", slot, tag);
                    let built =
                        (codec.init)(&mut *self.heap, value).map_err(|e| e.at(*slot, tag))?;
                    if built.is_null() {
                        return Err(Error::NullInitResult {
                            slot: *slot,
                            tag: tag.to_string(),
                        });
                    }
                    self.states[*slot] = State::Provisional(built.clone());
                    *object = Some(built);
                }
                Some(provisional) => {
                    trace!("Slot {}: finish {:?}", slot, tag);
                    let finish = codec
                        .finish
                        .as_ref()
                        .ok_or_else(|| Error::malformed(*slot, "final data without a finalizer"))?;
                    let result = finish(&mut *self.heap, provisional.clone(), value)
                        .map_err(|e| e.at(*slot, tag))?;
                    if !result.same_identity(provisional) {
                        return Err(Error::FinalizerIdentityViolation {
                            slot: *slot,
                            tag: tag.to_string(),
                        });
                    }
                    *finished = true;
                }
            },
        }
        Ok(())
    }

    fn complete(&mut self, frame: Frame<'t, 'r>) -> Result<()> {
        let (slot, value) = match frame {
            Frame::Seq { slot, obj, out, .. } => {
                if let Some(list) = self.heap.list_mut(obj) {
                    *list = out;
                }
                (slot, Value::Ref(obj))
            }
            Frame::Map { slot, obj, .. } => (slot, Value::Ref(obj)),
            Frame::Ext { slot, object, .. } => {
                let value = object
                    .ok_or_else(|| Error::malformed(slot, "init decoder never ran"))?;
                (slot, value)
            }
        };
        self.states[slot] = State::Final(value);
        Ok(())
    }

    fn pass_through(&self, slot: usize, s: &str) -> Result<Value> {
        match self.alphabet {
            WireAlphabet::Text => Ok(Value::Text(s.to_string())),
            WireAlphabet::Bytes => latin1_decode(s).map(Value::Bytes).map_err(|c| {
                Error::malformed(slot, format!("character {:?} is outside latin-1", c))
            }),
        }
    }
}

/// Rebuilds a value graph from its slot table
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r DecoderRegistry,
    config: Config,
}

impl<'r> Decoder<'r> {
    /// Create a decoder over `registry`
    pub fn new(registry: &'r DecoderRegistry, config: Config) -> Self {
        Decoder { registry, config }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decode `table` into `heap`, returning the root value
    pub fn decode(&self, heap: &mut Heap, table: &SlotTable) -> Result<Value> {
        debug!("Decoding {} slots", table.len());
        let mark = heap.checkpoint();

        let build = Build {
            table: table.entries(),
            registry: self.registry,
            alphabet: self.config.alphabet,
            heap: &mut *heap,
            states: vec![State::Unvisited; table.len()],
            stack: Vec::new(),
        };
        let result = build.run();

        match &result {
            Ok(_) => debug!("Decoded {} slots into {} heap objects", table.len(), heap.len()),
            Err(e) => {
                warn!("Decode aborted: {}", e);
                heap.truncate(mark);
            }
        }
        result
    }
}
