/* Bitmask diagram:

   NID | meaning
   ----+----------------------
   63  | INV  : complemented edge
   62  | VAR  : primary input
   61  | T    : constant
   0-31| IDX  : input index or gate index

*/
//! Node IDs: signals pointing at inputs, constants, and gates.
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A NID is a reference to a node in a `Base`, together with a polarity bit.
/// In AIG terms this is a *signal*: two NIDs can point at the same node and
/// differ only by the INV bit.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct NID { n: u64 }

const fn new(n:u64)->NID { NID{n} }

// -- bits in the nid ---

/// Single-bit mask representing that a NID is inverted.
const INV:u64 = 1<<63;

/// Single-bit mask indicating that a NID represents a primary input.
const VAR:u64 = 1<<62;

/// Single-bit mask indicating that the NID represents a constant. There is only
/// one constant node (O); I is its inverse.
const T:u64 = 1<<61;

/// Constant used to extract the index part of a NID.
const IDX_MASK:u64 = (1<<32)-1;

/// NID of the constant function 0, or "always false."
pub const O:NID = new(T);
/// NID of the constant function 1, or "always true."
pub const I:NID = new(T|INV);

impl NID {
  /// the signal for primary input `i`.
  pub const fn var(i:u32)->Self { new(VAR | i as u64) }
  /// the (uncomplemented) signal for the gate stored at index `ix`.
  pub const fn ixn(ix:usize)->Self { new(ix as u64 & IDX_MASK) }
  #[inline(always)] pub fn is_inv(&self)->bool { (self.n & INV) != 0 }
  #[inline(always)] pub fn is_var(&self)->bool { (self.n & VAR) != 0 }
  #[inline(always)] pub fn is_const(&self)->bool { (self.n & T) != 0 }
  /// Is n a literal (input or constant)?
  #[inline] pub fn is_lit(&self)->bool { self.is_var() || self.is_const() }
  /// is this NID an indexed gate (as opposed to a literal)?
  #[inline] pub fn is_ixn(&self)->bool { !self.is_lit() }
  /// index of the input or gate. (meaningless for constants)
  #[inline(always)] pub fn idx(&self)->usize { (self.n & IDX_MASK) as usize }
  /// Return the NID with the 'INV' flag removed.
  #[inline(always)] pub fn raw(self)->NID { new(self.n & !INV) }
  /// invert the signal when the flag is set.
  #[inline(always)] pub fn inv_if(self, flag:bool)->NID { if flag { !self } else { self }}}

impl std::ops::Not for NID {
  type Output = NID;
  fn not(self)-> NID { new(self.n^INV) }}

/// Pretty-printer for NIDs: `O`, `I`, `x3` for inputs, `#7` for gates.
impl fmt::Display for NID {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if self.is_const() { if self.is_inv() { write!(f, "I") } else { write!(f, "O") } }
    else {
      if self.is_inv() { write!(f, "¬")?; }
      if self.is_var() { write!(f, "x{}", self.idx()) }
      else { write!(f, "#{}", self.idx()) }}}}

/// Same as fmt::Display. Mostly so it's easier to see the problem when an assertion fails.
impl fmt::Debug for NID {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self) }}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("can't parse {0:?} as a nid")]
pub struct NidParseErr(pub String);

/// Parses the `Display` syntax. Both `¬` and `!` are accepted for inversion.
impl FromStr for NID {
  type Err = NidParseErr;
  fn from_str(s:&str)->Result<Self, Self::Err> {
    let bad = || NidParseErr(s.to_string());
    let (inv, body) =
      if let Some(rest) = s.strip_prefix('¬') { (true, rest) }
      else if let Some(rest) = s.strip_prefix('!') { (true, rest) }
      else { (false, s) };
    let nid = match body {
      "O" => O,
      "I" => I,
      _ => {
        let ix = |digits:&str| digits.parse::<u32>().map_err(|_| bad());
        if let Some(d) = body.strip_prefix('x') { NID::var(ix(d)?) }
        else if let Some(d) = body.strip_prefix('#') { NID::ixn(ix(d)? as usize) }
        else { return Err(bad()) }}};
    Ok(nid.inv_if(inv)) }}

/// Predefined input signals, handy for tests and examples.
#[allow(non_upper_case_globals)]
pub mod named {
  use super::NID;
  pub const x0:NID = NID::var(0);  pub const x1:NID = NID::var(1);
  pub const x2:NID = NID::var(2);  pub const x3:NID = NID::var(3);
  pub const x4:NID = NID::var(4);  pub const x5:NID = NID::var(5);
  pub const x6:NID = NID::var(6);  pub const x7:NID = NID::var(7); }


#[test] fn test_nids() {
  assert_eq!(O.n, 0x2000000000000000u64);
  assert_eq!(I.n, 0xa000000000000000u64);
  assert_eq!(NID::var(0), new(0x4000000000000000u64));
  assert_eq!(NID::var(3), new(0x4000000000000003u64));
  assert_eq!(NID::ixn(5), new(5));
  assert_eq!(!NID::ixn(5), new(0x8000000000000005u64)); }

#[test] fn test_flags() {
  let (x, g) = (NID::var(2), NID::ixn(9));
  assert!(x.is_var() && x.is_lit() && !x.is_ixn());
  assert!(g.is_ixn() && !g.is_lit() && !g.is_var());
  assert!(O.is_const() && I.is_const() && !O.is_inv() && I.is_inv());
  assert_eq!((!g).raw(), g);
  assert_eq!((!g).idx(), 9);
  assert_eq!(g.inv_if(true), !g);
  assert_eq!(g.inv_if(false), g); }

#[test] fn test_display() {
  assert_eq!(format!("{} {} {} {} {}", O, I, NID::var(3), NID::ixn(7), !NID::ixn(7)),
             "O I x3 #7 ¬#7"); }

#[test] fn test_parse() {
  for s in ["O", "I", "x0", "¬x12", "#4", "¬#40"] {
    assert_eq!(s.parse::<NID>().unwrap().to_string(), s); }
  assert_eq!("!x1".parse::<NID>(), Ok(!NID::var(1)));
  assert_eq!("y1".parse::<NID>(), Err(NidParseErr("y1".to_string())));
  assert!("#".parse::<NID>().is_err()); }
