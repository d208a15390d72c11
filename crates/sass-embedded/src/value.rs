//! The host-side SassScript value model: just enough structure to round-trip
//! values through function callbacks, with the Sass equality relation so
//! maps can be keyed the way the compiler keys them.

use crate::function::SassDynamicFunction;
use indexmap::IndexMap;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

/// A SassScript value crossing the host/compiler boundary.
///
/// Equality and hashing follow the Sass value model: quoted and unquoted
/// strings with the same text are equal, colors are equal when their
/// channels agree after conversion to a common model, and maps compare
/// without regard to entry order.
#[derive(Debug, Clone)]
pub enum Value {
    String(SassString),
    Number(SassNumber),
    Color(SassColor),
    List(SassList),
    ArgumentList(SassArgumentList),
    Map(SassMap),
    Calculation(SassCalculation),
    /// A first-class function defined in the compiler, opaque to the host.
    CompilerFunction(CompilerFunction),
    /// A first-class function defined on the host.
    HostFunction(SassDynamicFunction),
    Bool(bool),
    Null,
}

impl Value {
    /// The canonical SassScript `true`.
    pub const TRUE: Value = Value::Bool(true);
    /// The canonical SassScript `false`.
    pub const FALSE: Value = Value::Bool(false);
    /// The canonical SassScript `null`.
    pub const NULL: Value = Value::Null;

    /// A quoted string value.
    pub fn string(text: impl Into<String>) -> Self {
        Value::String(SassString {
            text: text.into(),
            quoted: true,
        })
    }

    /// An unquoted string value, such as an identifier.
    pub fn unquoted_string(text: impl Into<String>) -> Self {
        Value::String(SassString {
            text: text.into(),
            quoted: false,
        })
    }

    /// A unitless number value.
    pub fn number(value: f64) -> Self {
        Value::Number(SassNumber {
            value,
            numerator_units: Vec::new(),
            denominator_units: Vec::new(),
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.text == b.text,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Color(a), Value::Color(b)) => a.rgba() == b.rgba(),
            (Value::List(a), Value::List(b)) => a == b,
            (Value::ArgumentList(a), Value::ArgumentList(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Calculation(a), Value::Calculation(b)) => a == b,
            (Value::CompilerFunction(a), Value::CompilerFunction(b)) => a == b,
            (Value::HostFunction(a), Value::HostFunction(b)) => a.id() == b.id(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.text.hash(state),
            Value::Number(n) => n.hash(state),
            Value::Color(c) => {
                let (r, g, b, a) = c.rgba();
                hash_f64(r, state);
                hash_f64(g, state);
                hash_f64(b, state);
                hash_f64(a, state);
            }
            Value::List(l) => l.hash(state),
            Value::ArgumentList(l) => {
                l.separator.hash(state);
                l.contents.hash(state);
                for (name, value) in &l.keywords {
                    name.hash(state);
                    value.hash(state);
                }
            }
            Value::Map(m) => m.hash(state),
            Value::Calculation(c) => c.hash(state),
            Value::CompilerFunction(f) => f.hash(state),
            Value::HostFunction(f) => f.id().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

// Normalizes the two zeros; NaN payloads are hashed as-is, which is fine
// because NaN is never equal to anything anyway.
fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    state.write_u64(if value == 0.0 { 0 } else { value.to_bits() });
}

/// A SassScript string and whether it was written quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SassString {
    pub text: String,
    pub quoted: bool,
}

/// A SassScript number: a double with numerator and denominator units.
#[derive(Debug, Clone)]
pub struct SassNumber {
    pub value: f64,
    pub numerator_units: Vec<String>,
    pub denominator_units: Vec<String>,
}

impl PartialEq for SassNumber {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.numerator_units == other.numerator_units
            && self.denominator_units == other.denominator_units
    }
}

impl Eq for SassNumber {}

impl Hash for SassNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.value, state);
        self.numerator_units.hash(state);
        self.denominator_units.hash(state);
    }
}

/// The color model a [`SassColor`] was authored in. Drives which wire
/// representation the host sends back to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    Rgb,
    Hsl,
    Hwb,
}

/// A SassScript color, stored in whichever model it was authored in.
#[derive(Debug, Clone, Copy)]
pub struct SassColor {
    pub(crate) repr: ColorRepr,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ColorRepr {
    Rgb {
        red: u8,
        green: u8,
        blue: u8,
        alpha: f64,
    },
    Hsl {
        hue: f64,
        saturation: f64,
        lightness: f64,
        alpha: f64,
    },
    Hwb {
        hue: f64,
        whiteness: f64,
        blackness: f64,
        alpha: f64,
    },
}

impl SassColor {
    pub fn rgb(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self {
            repr: ColorRepr::Rgb {
                red,
                green,
                blue,
                alpha,
            },
        }
    }

    /// Hue in degrees; saturation and lightness as percentages.
    pub fn hsl(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        Self {
            repr: ColorRepr::Hsl {
                hue,
                saturation,
                lightness,
                alpha,
            },
        }
    }

    /// Hue in degrees; whiteness and blackness as percentages.
    pub fn hwb(hue: f64, whiteness: f64, blackness: f64, alpha: f64) -> Self {
        Self {
            repr: ColorRepr::Hwb {
                hue,
                whiteness,
                blackness,
                alpha,
            },
        }
    }

    pub fn preferred_format(&self) -> ColorFormat {
        match self.repr {
            ColorRepr::Rgb { .. } => ColorFormat::Rgb,
            ColorRepr::Hsl { .. } => ColorFormat::Hsl,
            ColorRepr::Hwb { .. } => ColorFormat::Hwb,
        }
    }

    pub fn alpha(&self) -> f64 {
        match self.repr {
            ColorRepr::Rgb { alpha, .. }
            | ColorRepr::Hsl { alpha, .. }
            | ColorRepr::Hwb { alpha, .. } => alpha,
        }
    }

    /// Channels converted to (red, green, blue, alpha) for comparison.
    pub(crate) fn rgba(&self) -> (f64, f64, f64, f64) {
        match self.repr {
            ColorRepr::Rgb {
                red,
                green,
                blue,
                alpha,
            } => (red as f64, green as f64, blue as f64, alpha),
            ColorRepr::Hsl {
                hue,
                saturation,
                lightness,
                alpha,
            } => {
                let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
                (r, g, b, alpha)
            }
            ColorRepr::Hwb {
                hue,
                whiteness,
                blackness,
                alpha,
            } => {
                let (r, g, b) = hwb_to_rgb(hue, whiteness, blackness);
                (r, g, b, alpha)
            }
        }
    }
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (f64, f64, f64) {
    let hue = hue.rem_euclid(360.0);
    let saturation = saturation / 100.0;
    let lightness = lightness / 100.0;

    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let hue_prime = hue / 60.0;
    let x = chroma * (1.0 - (hue_prime.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match hue_prime as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    ((r + m) * 255.0, (g + m) * 255.0, (b + m) * 255.0)
}

fn hwb_to_rgb(hue: f64, whiteness: f64, blackness: f64) -> (f64, f64, f64) {
    let mut whiteness = whiteness / 100.0;
    let mut blackness = blackness / 100.0;

    // Over-saturated whiteness and blackness normalize to gray.
    if whiteness + blackness > 1.0 {
        let sum = whiteness + blackness;
        whiteness /= sum;
        blackness /= sum;
    }

    let (r, g, b) = hsl_to_rgb(hue, 100.0, 50.0);
    let scale = |channel: f64| channel / 255.0 * (1.0 - whiteness - blackness) + whiteness;
    (
        scale(r) * 255.0,
        scale(g) * 255.0,
        scale(b) * 255.0,
    )
}

/// The separator of a Sass list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListSeparator {
    Comma,
    Space,
    Slash,
    /// Only valid for lists of zero or one element.
    Undecided,
}

/// A SassScript list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SassList {
    pub separator: ListSeparator,
    pub brackets: bool,
    pub contents: Vec<Value>,
}

impl SassList {
    pub fn new(contents: Vec<Value>, separator: ListSeparator, brackets: bool) -> Self {
        Self {
            separator,
            brackets,
            contents,
        }
    }
}

/// The argument list passed to a variadic function.
///
/// Reading [`SassArgumentList::keywords`] is observable: when the list was
/// created by the compiler, the access is reported back in the enclosing
/// function call's response so the compiler can decide whether to warn
/// about unused keyword arguments.
#[derive(Debug, Clone)]
pub struct SassArgumentList {
    pub(crate) id: u32,
    pub(crate) separator: ListSeparator,
    pub(crate) contents: Vec<Value>,
    pub(crate) keywords: IndexMap<String, Value>,
    pub(crate) observer: Option<KeywordsObserver>,
}

impl SassArgumentList {
    /// A host-authored argument list.
    pub fn new(
        contents: Vec<Value>,
        keywords: IndexMap<String, Value>,
        separator: ListSeparator,
    ) -> Self {
        Self {
            id: 0,
            separator,
            contents,
            keywords,
            observer: None,
        }
    }

    pub(crate) fn from_wire(
        id: u32,
        separator: ListSeparator,
        contents: Vec<Value>,
        keywords: IndexMap<String, Value>,
        observer: KeywordsObserver,
    ) -> Self {
        Self {
            id,
            separator,
            contents,
            keywords,
            observer: Some(observer),
        }
    }

    pub fn separator(&self) -> ListSeparator {
        self.separator
    }

    /// The positional arguments.
    pub fn positional(&self) -> &[Value] {
        &self.contents
    }

    /// The keyword arguments. Marks the keywords as accessed.
    pub fn keywords(&self) -> &IndexMap<String, Value> {
        if let Some(observer) = &self.observer {
            observer.record(self.id);
        }
        &self.keywords
    }
}

impl PartialEq for SassArgumentList {
    fn eq(&self, other: &Self) -> bool {
        self.separator == other.separator
            && self.contents == other.contents
            && self.keywords == other.keywords
    }
}

impl Eq for SassArgumentList {}

/// Collects the IDs of compiler-created argument lists whose keywords were
/// read during one function call.
#[derive(Debug, Clone, Default)]
pub(crate) struct KeywordsObserver {
    accessed: Arc<Mutex<BTreeSet<u32>>>,
}

impl KeywordsObserver {
    pub(crate) fn record(&self, id: u32) {
        if id != 0 {
            self.accessed.lock().unwrap().insert(id);
        }
    }

    pub(crate) fn accessed(&self) -> Vec<u32> {
        self.accessed.lock().unwrap().iter().copied().collect()
    }
}

/// A SassScript map, ordered by insertion like the compiler's own maps.
#[derive(Debug, Clone, Default)]
pub struct SassMap {
    entries: IndexMap<Value, Value>,
}

impl SassMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning false if `key` was already present.
    pub fn insert(&mut self, key: Value, value: Value) -> bool {
        match self.entries.entry(key) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for SassMap {
    // Sass maps compare without regard to entry order.
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.entries.get(key) == Some(value))
    }
}

impl Eq for SassMap {}

impl Hash for SassMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent to stay consistent with equality: fold each
        // entry's hash with xor.
        let mut acc = 0u64;
        for (key, value) in &self.entries {
            let mut entry_hasher = DefaultHasher::new();
            key.hash(&mut entry_hasher);
            value.hash(&mut entry_hasher);
            acc ^= entry_hasher.finish();
        }
        state.write_u64(acc);
        state.write_usize(self.entries.len());
    }
}

/// A `calc()`, `min()`, `max()`, or `clamp()` expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SassCalculation {
    pub name: String,
    pub arguments: Vec<CalculationValue>,
}

/// One component of a calculation expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CalculationValue {
    Number(SassNumber),
    /// An unquoted string, such as a variable reference.
    String(String),
    /// An unquoted string produced by interpolation.
    Interpolation(String),
    Operation(Box<CalculationOperation>),
    Calculation(SassCalculation),
}

/// A binary operation inside a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalculationOperation {
    pub operator: CalculationOperator,
    pub left: CalculationValue,
    pub right: CalculationValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculationOperator {
    Plus,
    Minus,
    Times,
    Divide,
}

/// A first-class function defined in the compiler. The host can pass it
/// back to the compiler but cannot invoke it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompilerFunction {
    pub(crate) id: u32,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn string_equality_ignores_quoting() {
        assert_eq!(Value::string("fish"), Value::unquoted_string("fish"));
        assert_ne!(Value::string("fish"), Value::string("fowl"));
    }

    #[test]
    fn color_equality_crosses_models() {
        // hsl(0, 100%, 50%) is pure red.
        let red = Value::Color(SassColor::rgb(255, 0, 0, 1.0));
        let hsl_red = Value::Color(SassColor::hsl(0.0, 100.0, 50.0, 1.0));
        assert_eq!(red, hsl_red);

        // hwb with w + b > 100 normalizes to gray.
        let gray = Value::Color(SassColor::hwb(120.0, 100.0, 100.0, 1.0));
        let rgb_gray = Value::Color(SassColor::rgb(127, 128, 127, 1.0));
        assert_ne!(gray, rgb_gray);
    }

    #[test]
    fn map_equality_is_order_independent() {
        let mut a = SassMap::new();
        assert!(a.insert(Value::string("x"), Value::number(1.0)));
        assert!(a.insert(Value::string("y"), Value::number(2.0)));

        let mut b = SassMap::new();
        assert!(b.insert(Value::string("y"), Value::number(2.0)));
        assert!(b.insert(Value::string("x"), Value::number(1.0)));

        assert_eq!(Value::Map(a), Value::Map(b));
    }

    #[test]
    fn map_rejects_duplicate_keys() {
        let mut map = SassMap::new();
        assert!(map.insert(Value::string("x"), Value::number(1.0)));
        // Unquoted "x" is the same Sass key as quoted "x".
        assert!(!map.insert(Value::unquoted_string("x"), Value::number(2.0)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn keyword_access_is_observed() {
        let observer = KeywordsObserver::default();
        let list = SassArgumentList::from_wire(
            26,
            ListSeparator::Comma,
            vec![],
            IndexMap::new(),
            observer.clone(),
        );

        assert!(observer.accessed().is_empty());
        let _ = list.keywords();
        let _ = list.keywords();
        assert_eq!(observer.accessed(), vec![26]);

        // Host-authored lists (id 0) are never reported.
        let host = SassArgumentList::from_wire(
            0,
            ListSeparator::Comma,
            vec![],
            IndexMap::new(),
            observer.clone(),
        );
        let _ = host.keywords();
        assert_eq!(observer.accessed(), vec![26]);
    }
}
