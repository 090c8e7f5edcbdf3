//! Graph walker: value -> slot table
//!
//! Depth-first, first-discovery slot order, driven by an explicit work stack
//! so graph depth never touches the host call stack.
//!
//! ## Visiting a value
//!
//! 1. `Null`, bool and numbers get a fresh slot holding the value itself.
//! 2. The pass-through string kind gets a fresh slot holding the string.
//! 3. Anything else is looked up in the identity map; a hit returns the
//!    existing slot, which is what collapses shared objects and cycles.
//!    A hit on a tagged value whose init data is still being walked fails
//!    with [`Error::InitCycle`]: the decoder would need that object before
//!    its init decoder could create it.
//! 4. Otherwise a slot is reserved *before* the children are walked:
//!    - list: `[x, [j], ...]`, scalars inline, everything else by reference
//!    - mapping: `["sg/", p1, p2, ...]`, each `p` a `[key, value]` pair slot
//!    - extension / foreign string: `["sg/tag", init]` or
//!      `["sg/tag", init, final]` from the registered codec
//!
//! Mapping pairs and codec payloads are allocated in the caller's heap while
//! walking and released again before `encode` returns.

use crate::config::{Config, ForeignStrings};
use crate::error::{Error, Result};
use crate::registry::{EncoderEntry, EncoderRegistry, TypeKey};
use crate::tracker::{Identity, IdentityTracker};
use slotgraph_core::{Heap, Object, Value};
use slotgraph_wire::markers::wire_tag;
use slotgraph_wire::{latin1_encode, Entry, SlotTable, WireAlphabet, MAPPING_MARKER};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Plain list: scalars inline, the rest as `[j]`
    Seq,
    /// Marker or tag followed by bare slot indices
    Indexed,
}

#[derive(Debug)]
struct Frame {
    slot: usize,
    layout: Layout,
    children: Vec<Value>,
    next: usize,
    out: Vec<Entry>,
    /// Tagged frame whose init child has not finished walking
    init_open: bool,
}

impl Frame {
    fn seq(slot: usize, children: Vec<Value>) -> Self {
        Frame {
            slot,
            layout: Layout::Seq,
            out: Vec::with_capacity(children.len()),
            children,
            next: 0,
            init_open: false,
        }
    }

    fn indexed(slot: usize, leader: String, children: Vec<Value>) -> Self {
        let mut out = Vec::with_capacity(children.len() + 1);
        out.push(Entry::Str(leader));
        Frame {
            slot,
            layout: Layout::Indexed,
            out,
            children,
            next: 0,
            init_open: false,
        }
    }

    fn tagged(slot: usize, tag: String, children: Vec<Value>) -> Self {
        Frame {
            init_open: true,
            ..Frame::indexed(slot, tag, children)
        }
    }
}

fn scalar_entry(value: &Value) -> Option<Entry> {
    match value {
        Value::Null => Some(Entry::Null),
        Value::Bool(b) => Some(Entry::Bool(*b)),
        Value::Int(i) => Some(Entry::Int(*i)),
        Value::Float(f) => Some(Entry::Float(*f)),
        _ => None,
    }
}

/// What to do with a heap object once its identity is known to be new
enum Composite {
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Ext(TypeKey, &'static str),
}

/// Walks a value graph and produces its slot table
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'r> {
    registry: &'r EncoderRegistry,
    config: Config,
}

impl<'r> Encoder<'r> {
    /// Create an encoder over `registry`
    pub fn new(registry: &'r EncoderRegistry, config: Config) -> Self {
        Encoder { registry, config }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encode the graph rooted at `value`.
    ///
    /// The heap is mutated only for scratch allocations, which are released
    /// before returning, on success and on failure alike.
    pub fn encode(&self, heap: &mut Heap, value: &Value) -> Result<SlotTable> {
        let mark = heap.checkpoint();
        debug!(
            "Encoding {} root ({} heap objects)",
            value.type_name(),
            heap.len()
        );

        let result = self.walk(heap, value);
        heap.truncate(mark);

        match &result {
            Ok(table) => debug!("Encoded {} slots", table.len()),
            Err(e) => debug!("Encode aborted: {}", e),
        }
        result
    }

    fn walk(&self, heap: &mut Heap, root: &Value) -> Result<SlotTable> {
        let mut tracker = IdentityTracker::new();
        let mut stack: Vec<Frame> = Vec::new();

        self.visit(heap, &mut tracker, &mut stack, root)?;

        while let Some(frame) = stack.last_mut() {
            // Back on top after handing out the init child: its subtree is done
            if frame.init_open && frame.next > 0 {
                frame.init_open = false;
                tracker.close_init(frame.slot);
            }

            if frame.next == frame.children.len() {
                if let Some(done) = stack.pop() {
                    tracker.fill(done.slot, Entry::Seq(done.out));
                }
                continue;
            }

            let child = std::mem::replace(&mut frame.children[frame.next], Value::Null);
            frame.next += 1;

            if frame.layout == Layout::Seq {
                if let Some(entry) = scalar_entry(&child) {
                    frame.out.push(entry);
                    continue;
                }
            }

            let parent = stack.len() - 1;
            let slot = self.visit(heap, &mut tracker, &mut stack, &child)?;
            let frame = &mut stack[parent];
            frame.out.push(match frame.layout {
                Layout::Seq => Entry::reference(slot),
                Layout::Indexed => Entry::index(slot),
            });
        }

        tracker.finish()
    }

    /// Assign a slot to `value`, pushing a frame if its children still
    /// need walking. Returns the slot index.
    fn visit(
        &self,
        heap: &mut Heap,
        tracker: &mut IdentityTracker,
        stack: &mut Vec<Frame>,
        value: &Value,
    ) -> Result<usize> {
        if let Some(entry) = scalar_entry(value) {
            return Ok(tracker.push_done(entry));
        }

        let r = match (value, self.config.alphabet) {
            (Value::Text(s), WireAlphabet::Text) => {
                return Ok(tracker.push_done(Entry::Str(s.clone())));
            }
            (Value::Bytes(b), WireAlphabet::Bytes) => {
                return Ok(tracker.push_done(Entry::Str(latin1_encode(b))));
            }
            (Value::Text(_), _) | (Value::Bytes(_), _) => {
                return self.visit_foreign(heap, tracker, stack, value);
            }
            (Value::Ref(r), _) => *r,
            _ => {
                return Err(Error::UnencodableType {
                    type_name: value.type_name().to_string(),
                })
            }
        };

        let id = Identity::Object(r);
        if let Some(slot) = tracker.lookup(&id) {
            return tracker.revisit(slot);
        }

        let composite = match heap.get(r).ok_or(Error::DanglingRef(r))? {
            Object::List(items) => Composite::List(items.clone()),
            Object::Map(map) => {
                Composite::Map(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            }
            Object::Ext(ext) => {
                Composite::Ext(TypeKey::Ext(ext.concrete_type_id()), ext.type_name())
            }
        };

        match composite {
            Composite::List(items) => {
                let slot = tracker.reserve(Some(id));
                stack.push(Frame::seq(slot, items));
                Ok(slot)
            }
            Composite::Map(pairs) => {
                let slot = tracker.reserve(Some(id));
                let children = pairs
                    .into_iter()
                    .map(|(k, v)| heap.new_list(vec![k, v]))
                    .collect();
                stack.push(Frame::indexed(slot, MAPPING_MARKER.to_string(), children));
                Ok(slot)
            }
            Composite::Ext(key, type_name) => {
                let codec = self
                    .registry
                    .lookup(&key)
                    .ok_or_else(|| Error::UnencodableType {
                        type_name: type_name.to_string(),
                    })?;
                let slot = tracker.reserve(Some(id));
                self.apply(heap, tracker, stack, slot, codec, value)?;
                Ok(slot)
            }
        }
    }

    /// The string kind that is not passed through goes via its codec
    fn visit_foreign(
        &self,
        heap: &mut Heap,
        tracker: &mut IdentityTracker,
        stack: &mut Vec<Frame>,
        value: &Value,
    ) -> Result<usize> {
        let id = match (self.config.foreign_strings, value) {
            (ForeignStrings::Interned, Value::Text(s)) => Some(Identity::Text(s.clone())),
            (ForeignStrings::Interned, Value::Bytes(b)) => Some(Identity::Bytes(b.clone())),
            _ => None,
        };
        if let Some(slot) = id.as_ref().and_then(|id| tracker.lookup(id)) {
            return tracker.revisit(slot);
        }

        let codec = self
            .registry
            .lookup(&self.config.foreign_string_key())
            .ok_or_else(|| Error::UnencodableType {
                type_name: value.type_name().to_string(),
            })?;
        let slot = tracker.reserve(id);
        self.apply(heap, tracker, stack, slot, codec, value)?;
        Ok(slot)
    }

    fn apply(
        &self,
        heap: &mut Heap,
        tracker: &mut IdentityTracker,
        stack: &mut Vec<Frame>,
        slot: usize,
        codec: &EncoderEntry,
        value: &Value,
    ) -> Result<()> {
        trace!("Encoding slot {} with codec {:?}", slot, codec.tag);
        let parts = (codec.encode)(heap, value).map_err(|e| e.at(slot, &codec.tag))?;

        let mut children = Vec::with_capacity(2);
        children.push(parts.init);
        children.extend(parts.finish);
        tracker.open_init(slot, &codec.type_name);
        stack.push(Frame::tagged(slot, wire_tag(&codec.tag), children));
        Ok(())
    }
}
