//! Typed n-dimensional array, the two-phase reference codec
//!
//! Numeric arrays are fully described by dtype, shape and packed
//! little-endian bytes, and decode in one phase:
//!
//! ```text
//! init  = [["dtype", "int64"], ["shape", [2, 2]], ["data", <bytes>]]
//! ```
//!
//! An `object` array is a zero-dimensional box around one arbitrary value.
//! The box must exist before its content is decoded, because the content
//! may contain the box itself:
//!
//! ```text
//! init  = [["dtype", "object"], ["shape", []]]
//! final = [["data", <value>]]
//! ```

use crate::fields::{list_of, wire_text, write_fields, Fields};
use byteorder::{ByteOrder, LittleEndian};
use slotgraph_core::{Extension, Heap, Value};
use slotgraph_engine::{Codec, CodecError, Parts, TypeKey};
use slotgraph_wire::WireAlphabet;
use std::any::Any;

/// Element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// One byte, 0 or 1
    Bool,
    /// Signed 8-bit
    Int8,
    /// Signed 16-bit
    Int16,
    /// Signed 32-bit
    Int32,
    /// Signed 64-bit
    Int64,
    /// Unsigned 8-bit
    UInt8,
    /// Unsigned 16-bit
    UInt16,
    /// Unsigned 32-bit
    UInt32,
    /// Unsigned 64-bit
    UInt64,
    /// IEEE-754 single
    Float32,
    /// IEEE-754 double
    Float64,
    /// One boxed value
    Object,
}

const ALL_DTYPES: [DType; 12] = [
    DType::Bool,
    DType::Int8,
    DType::Int16,
    DType::Int32,
    DType::Int64,
    DType::UInt8,
    DType::UInt16,
    DType::UInt32,
    DType::UInt64,
    DType::Float32,
    DType::Float64,
    DType::Object,
];

impl DType {
    /// Wire name
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Object => "object",
        }
    }

    /// Parse a wire name
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_DTYPES.iter().copied().find(|d| d.name() == name)
    }

    /// Bytes per element, `None` for `Object`
    pub fn item_size(self) -> Option<usize> {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => Some(1),
            DType::Int16 | DType::UInt16 => Some(2),
            DType::Int32 | DType::UInt32 | DType::Float32 => Some(4),
            DType::Int64 | DType::UInt64 | DType::Float64 => Some(8),
            DType::Object => None,
        }
    }
}

/// Array contents
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    /// Little-endian packed elements
    Packed(Vec<u8>),
    /// The single value of an `object` array
    Boxed(Value),
}

/// N-dimensional array
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    dtype: DType,
    shape: Vec<usize>,
    data: ArrayData,
}

/// Product of the dimensions, `None` if it does not fit in a `usize`
fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |n, &dim| n.checked_mul(dim))
}

impl NdArray {
    /// Wrap packed little-endian bytes.
    ///
    /// Fails for `Object` or when the length does not match the shape.
    pub fn from_bytes(dtype: DType, shape: Vec<usize>, bytes: Vec<u8>) -> Result<Self, CodecError> {
        let size = dtype
            .item_size()
            .ok_or_else(|| CodecError::invalid("object arrays have no packed form"))?;
        let expected = element_count(&shape)
            .and_then(|n| n.checked_mul(size))
            .ok_or_else(|| {
                CodecError::invalid(format!("shape {:?} of {} is too large", shape, dtype.name()))
            })?;
        if bytes.len() != expected {
            return Err(CodecError::invalid(format!(
                "{} bytes do not fill shape {:?} of {} (expected {})",
                bytes.len(),
                shape,
                dtype.name(),
                expected
            )));
        }
        Ok(NdArray {
            dtype,
            shape,
            data: ArrayData::Packed(bytes),
        })
    }

    /// `float64` array
    pub fn from_f64(shape: Vec<usize>, values: &[f64]) -> Result<Self, CodecError> {
        let mut bytes = vec![0u8; values.len() * 8];
        LittleEndian::write_f64_into(values, &mut bytes);
        Self::from_bytes(DType::Float64, shape, bytes)
    }

    /// `int64` array
    pub fn from_i64(shape: Vec<usize>, values: &[i64]) -> Result<Self, CodecError> {
        let mut bytes = vec![0u8; values.len() * 8];
        LittleEndian::write_i64_into(values, &mut bytes);
        Self::from_bytes(DType::Int64, shape, bytes)
    }

    /// `int32` array
    pub fn from_i32(shape: Vec<usize>, values: &[i32]) -> Result<Self, CodecError> {
        let mut bytes = vec![0u8; values.len() * 4];
        LittleEndian::write_i32_into(values, &mut bytes);
        Self::from_bytes(DType::Int32, shape, bytes)
    }

    /// Zero-dimensional `object` array holding `value`
    pub fn boxed(value: Value) -> Self {
        NdArray {
            dtype: DType::Object,
            shape: Vec::new(),
            data: ArrayData::Boxed(value),
        }
    }

    /// Element type
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Dimensions
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        // Shapes are checked on construction
        element_count(&self.shape).unwrap_or(usize::MAX)
    }

    /// Check if the array has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Packed bytes of a numeric array
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.data {
            ArrayData::Packed(bytes) => Some(bytes),
            ArrayData::Boxed(_) => None,
        }
    }

    /// Content of an `object` array
    pub fn boxed_value(&self) -> Option<&Value> {
        match &self.data {
            ArrayData::Boxed(value) => Some(value),
            ArrayData::Packed(_) => None,
        }
    }

    /// Replace the content of an `object` array
    pub fn set_boxed(&mut self, value: Value) -> Result<(), CodecError> {
        match &mut self.data {
            ArrayData::Boxed(slot) => {
                *slot = value;
                Ok(())
            }
            ArrayData::Packed(_) => Err(CodecError::invalid(format!(
                "cannot box a value in a {} array",
                self.dtype.name()
            ))),
        }
    }

    /// Elements widened to `i64`; `None` for float and object arrays or on
    /// `uint64` overflow
    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        let bytes = self.bytes()?;
        let n = self.len();
        match self.dtype {
            DType::Bool | DType::UInt8 => Some(bytes.iter().map(|&b| i64::from(b)).collect()),
            DType::Int8 => Some(bytes.iter().map(|&b| i64::from(b as i8)).collect()),
            DType::Int16 => {
                let mut out = vec![0i16; n];
                LittleEndian::read_i16_into(bytes, &mut out);
                Some(out.into_iter().map(i64::from).collect())
            }
            DType::UInt16 => {
                let mut out = vec![0u16; n];
                LittleEndian::read_u16_into(bytes, &mut out);
                Some(out.into_iter().map(i64::from).collect())
            }
            DType::Int32 => {
                let mut out = vec![0i32; n];
                LittleEndian::read_i32_into(bytes, &mut out);
                Some(out.into_iter().map(i64::from).collect())
            }
            DType::UInt32 => {
                let mut out = vec![0u32; n];
                LittleEndian::read_u32_into(bytes, &mut out);
                Some(out.into_iter().map(i64::from).collect())
            }
            DType::Int64 => {
                let mut out = vec![0i64; n];
                LittleEndian::read_i64_into(bytes, &mut out);
                Some(out)
            }
            DType::UInt64 => {
                let mut out = vec![0u64; n];
                LittleEndian::read_u64_into(bytes, &mut out);
                out.into_iter().map(|u| i64::try_from(u).ok()).collect()
            }
            DType::Float32 | DType::Float64 | DType::Object => None,
        }
    }

    /// Elements widened to `f64`; `None` for object arrays
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        let bytes = self.bytes()?;
        let n = self.len();
        match self.dtype {
            DType::Float64 => {
                let mut out = vec![0f64; n];
                LittleEndian::read_f64_into(bytes, &mut out);
                Some(out)
            }
            DType::Float32 => {
                let mut out = vec![0f32; n];
                LittleEndian::read_f32_into(bytes, &mut out);
                Some(out.into_iter().map(f64::from).collect())
            }
            _ => self
                .to_i64_vec()
                .map(|v| v.into_iter().map(|i| i as f64).collect()),
        }
    }
}

impl Extension for NdArray {
    fn type_name(&self) -> &'static str {
        "NdArray"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn children(&self) -> Vec<Value> {
        self.boxed_value().cloned().into_iter().collect()
    }

    fn shallow_eq(&self, other: &dyn Extension) -> bool {
        other.downcast_ref::<NdArray>().map_or(false, |o| {
            o.dtype == self.dtype && o.shape == self.shape && o.bytes() == self.bytes()
        })
    }
}

/// Codec for [`NdArray`], tag `"ndarray"`
#[derive(Debug, Clone, Copy, Default)]
pub struct NdArrayCodec {
    alphabet: WireAlphabet,
}

impl NdArrayCodec {
    /// Codec writing field names in the pass-through kind of `alphabet`
    pub fn new(alphabet: WireAlphabet) -> Self {
        NdArrayCodec { alphabet }
    }
}

impl Codec for NdArrayCodec {
    fn tag(&self) -> &'static str {
        "ndarray"
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::of::<NdArray>()
    }

    fn type_name(&self) -> &'static str {
        "NdArray"
    }

    fn encode(&self, heap: &mut Heap, value: &Value) -> Result<Parts, CodecError> {
        let array = value
            .as_obj()
            .and_then(|r| heap.ext::<NdArray>(r))
            .cloned()
            .ok_or(CodecError::WrongType {
                expected: "NdArray",
                actual: value.type_name(),
            })?;

        let dtype = wire_text(self.alphabet, array.dtype.name());
        let shape = heap.new_list(array.shape.iter().map(|&d| Value::Int(d as i64)).collect());

        match array.data {
            ArrayData::Packed(bytes) => {
                let init = write_fields(
                    heap,
                    self.alphabet,
                    vec![("dtype", dtype), ("shape", shape), ("data", Value::Bytes(bytes))],
                );
                Ok(Parts::single(init))
            }
            ArrayData::Boxed(boxed) => {
                let init = write_fields(heap, self.alphabet, vec![("dtype", dtype), ("shape", shape)]);
                let finish = write_fields(heap, self.alphabet, vec![("data", boxed)]);
                Ok(Parts::two_phase(init, finish))
            }
        }
    }

    fn init(&self, heap: &mut Heap, data: Value) -> Result<Value, CodecError> {
        let fields = Fields::read(heap, &data)?;
        let name = fields.text("dtype")?;
        let dtype = DType::from_name(&name)
            .ok_or_else(|| CodecError::invalid(format!("unknown dtype {:?}", name)))?;

        let mut shape = Vec::new();
        for dim in list_of(heap, fields.get("shape")?, "shape")? {
            let dim = dim
                .as_int()
                .and_then(|d| usize::try_from(d).ok())
                .ok_or_else(|| CodecError::invalid("shape entries must be non-negative integers"))?;
            shape.push(dim);
        }

        let array = match dtype {
            DType::Object => {
                if element_count(&shape) != Some(1) {
                    return Err(CodecError::invalid(format!(
                        "object arrays hold exactly one value, shape {:?} does not",
                        shape
                    )));
                }
                NdArray {
                    dtype,
                    shape,
                    data: ArrayData::Boxed(Value::Null),
                }
            }
            _ => {
                let bytes = fields
                    .get("data")?
                    .as_bytes()
                    .ok_or_else(|| CodecError::invalid("numeric array data must be bytes"))?
                    .to_vec();
                NdArray::from_bytes(dtype, shape, bytes)?
            }
        };
        Ok(heap.new_ext(array))
    }

    fn is_two_phase(&self) -> bool {
        true
    }

    fn finish(&self, heap: &mut Heap, object: Value, data: Value) -> Result<Value, CodecError> {
        let boxed = Fields::read(heap, &data)?.get("data")?.clone();
        let array = object
            .as_obj()
            .and_then(|r| heap.ext_mut::<NdArray>(r))
            .ok_or_else(|| CodecError::invalid("finish called on a non-array object"))?;
        array.set_boxed(boxed)?;
        Ok(object)
    }
}
