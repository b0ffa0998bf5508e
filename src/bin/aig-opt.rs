//! aig-opt: reduce the depth of an and-inverter graph stored as json.
//!
//! usage: aig-opt IN.json [-o OUT.json] [--check] [--dot FILE] [-v]
#[macro_use] extern crate log;
extern crate aigdepth;
extern crate simplelog;
use aigdepth::{aig::AigBase, depth::CriticalityInfo, sim, Base, GraphViz, optimize_depth};
use simplelog::{TermLogger, LevelFilter, Config};

include!(concat!(env!("OUT_DIR"), "/aigdepth-build-info.rs"));

fn usage()->! {
  eprintln!("usage: aig-opt IN.json [-o OUT.json] [--check] [--dot FILE] [-v]");
  std::process::exit(2) }

pub fn main() {
  // -- parse arguments ----
  let mut input:Option<String> = None;
  let mut output:Option<String> = None;
  let mut dot:Option<String> = None;
  let mut check = false;
  let mut level = LevelFilter::Info;
  let mut get_output = false; let mut get_dot = false;
  for a in std::env::args().skip(1) {
    if get_output { output = Some(a); get_output = false; }
    else if get_dot { dot = Some(a); get_dot = false; }
    else { match a.as_str() {
      "-o" => get_output = true,
      "--dot" => get_dot = true,
      "--check" => check = true,
      "-v" => level = LevelFilter::Debug,
      "-h" | "--help" => usage(),
      _ if a.starts_with('-') => { eprintln!("unknown option: {}", a); usage() }
      _ => input = Some(a) }}}
  if get_output || get_dot { usage() }
  let Some(input) = input else { usage() };
  if TermLogger::init(level, Config::default()).is_err() { eprintln!("note: logger was already set"); }

  // -- print current configuration ---
  println!("[aigdepth {AIGDEPTH_VERSION} -O{AIGDEPTH_OPT_LEVEL}] aig-opt {input}");

  let mut net = match AigBase::load(&input) {
    Ok(net) => net,
    Err(e) => { eprintln!("{}: {}", input, e); std::process::exit(1) }};
  if check && net.num_inputs() > sim::MAX_INPUTS {
    warn!("--check skipped: {} inputs is too many to simulate", net.num_inputs());
    check = false }
  let orig = if check { Some(sim::truth_tables(&net)) } else { None };
  println!("inputs: {} outputs: {} gates: {}", net.num_inputs(), net.outputs().len(), net.num_gates());

  // ---- optimize
  let stats = optimize_depth(&mut net);
  let net = net.repack();
  let ci = CriticalityInfo::refresh(&net);
  println!("{}", stats);
  println!("gates: {} critical: {}", net.num_gates(), ci.num_critical());

  if let Some(tables) = orig {
    if sim::truth_tables(&net) == tables { println!("check: ok") }
    else { eprintln!("check: FAILED (outputs differ after rewriting)"); std::process::exit(1) }}

  if let Some(path) = dot {
    match net.outputs().first() {
      Some(&o) => {
        if net.outputs().len() > 1 { warn!("--dot only renders the first output") }
        if let Err(e) = net.save_dot(o, &path) { eprintln!("{}: {}", path, e); std::process::exit(1) }}
      None => eprintln!("no outputs to render") }}

  if let Some(path) = output {
    if let Err(e) = net.save(&path) { eprintln!("{}: {}", path, e); std::process::exit(1) }
    println!("wrote {}", path) }}
