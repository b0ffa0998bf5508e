// JSON interchange for AigBase. (included by aig.rs)
//
// Layout:  { "format": "aigdepth-aig-0.01", "inputs": 3,
//            "ands": [null, ["x0","¬x1"], ["x2",-1], ...],
//            "outs": [-2], "tags": { "a": 1 } }
//
// Gates are listed in topological order starting at position 1. A fanin is
// either a literal written as a string, or the position of an earlier gate,
// negated when the edge is complemented.

/// Format tag written to (and required from) every JSON network.
pub const AIG_JSON_FORMAT:&str = "aigdepth-aig-0.01";

impl AigBase {
  pub fn to_json(&self)->String {
    let mut ands = json::array![json::JsonValue::Null];
    let mut mapping:FxHashMap<NID, i64> = FxHashMap::default();
    let enc = |mapping:&FxHashMap<NID,i64>, x:NID|->json::JsonValue {
      if x.is_lit() { json::JsonValue::String(x.to_string()) }
      else {
        let ix = mapping[&x.raw()];
        json::JsonValue::from(if x.is_inv() { -ix } else { ix }) }};
    for g in self.live_gates() {
      let [x, y] = self.fanins(g);
      ands.push(json::array![enc(&mapping, x), enc(&mapping, y)])
        .expect("failed to push to ands");
      mapping.insert(g, ands.len() as i64 - 1); }
    let outs:Vec<json::JsonValue> = self.outs.iter().map(|&o| enc(&mapping, o)).collect();
    let mut tags = json::JsonValue::new_object();
    let mut keys:Vec<&String> = self.tags.keys().collect();
    keys.sort();
    for k in keys {
      let v = self.tags[k];
      if v.is_lit() || mapping.contains_key(&v.raw()) { tags[k.as_str()] = enc(&mapping, v) }}
    let ninputs = self.ninputs;
    let out = json::object!{
      "format": AIG_JSON_FORMAT,
      "inputs": ninputs,
      "ands": ands,
      "outs": outs,
      "tags": tags };
    out.dump() }

  /// Build a network from the output of `to_json`.
  pub fn load_json(s:&str)->Result<AigBase, AigErr> {
    let data = json::parse(s)?;
    let fmt = data["format"].as_str().unwrap_or("");
    if fmt != AIG_JSON_FORMAT {
      return Err(AigErr::Format{ expected: AIG_JSON_FORMAT, got: fmt.to_string() }) }
    let ninputs = data["inputs"].as_usize()
      .ok_or_else(|| AigErr::BadRef(format!("inputs: {}", data["inputs"].dump())))?;
    let mut res = <AigBase as Base>::new(ninputs);
    let mut mapping:Vec<NID> = vec![O];
    let dec = |mapping:&[NID], v:&json::JsonValue|->Result<NID, AigErr> {
      let bad = || AigErr::BadRef(v.dump());
      if let Some(s) = v.as_str() {
        let n:NID = s.parse().map_err(|_| bad())?;
        if n.is_ixn() || (n.is_var() && n.idx() >= ninputs) { Err(bad()) } else { Ok(n) }}
      else if let Some(i) = v.as_i64() {
        let ix = i.unsigned_abs() as usize;
        if i == 0 || ix >= mapping.len() { Err(bad()) } else { Ok(mapping[ix].inv_if(i < 0)) }}
      else { Err(bad()) }};
    for node in data["ands"].members().skip(1) {
      let x = dec(&mapping, &node[0])?;
      let y = dec(&mapping, &node[1])?;
      mapping.push(res.and(x, y)); }
    for o in data["outs"].members() {
      let o = dec(&mapping, o)?;
      res.add_output(o); }
    for (k, v) in data["tags"].entries() {
      let n = dec(&mapping, v)?;
      res.tag(n, k.to_string()); }
    Ok(res) }

  pub fn save(&self, path:&str)->::std::io::Result<()> {
    std::fs::write(path, self.to_json()) }

  pub fn load(path:&str)->Result<AigBase, AigErr> {
    let s = std::fs::read_to_string(path)?;
    AigBase::load_json(&s) }}

#[test] fn test_json_layout() {
  nid_vars![x0, x1, x2];
  let mut b = <AigBase as Base>::new(3);
  let a = b.and(x0, !x1);
  let c = b.and(!a, x2);
  b.add_output(!c);
  b.tag(a, "a".to_string());
  let s = b.to_json();
  assert_eq!(s, concat!(r#"{"format":"aigdepth-aig-0.01","inputs":3,"#,
                        r#""ands":[null,["x0","¬x1"],["x2",-1]],"outs":[-2],"tags":{"a":1}}"#)); }

#[test] fn test_json_roundtrip() {
  nid_vars![x0, x1, x2, x3];
  let mut b = <AigBase as Base>::new(4);
  let f = expr![b, ((x0 & (!x1)) | (x2 & x3))];
  let g = expr![b, ((!x0) & x3)];
  b.add_output(f); b.add_output(!g); b.add_output(crate::nid::I); b.add_output(x1);
  b.tag(f, "f".to_string());
  let r = AigBase::load_json(&b.to_json()).unwrap();
  assert_eq!(r.num_inputs(), 4);
  assert_eq!(r.num_gates(), b.num_gates());
  assert_eq!(crate::sim::truth_tables(&r), crate::sim::truth_tables(&b));
  assert_eq!(r.get("f"), Some(r.outputs()[0]));
  assert_eq!(&r.outputs()[2..], &[crate::nid::I, x1]); }

#[test] fn test_json_errors() {
  assert!(matches!(AigBase::load_json("{"), Err(AigErr::Json(_))));
  assert!(matches!(AigBase::load_json(r#"{"format":"blif-0.01"}"#), Err(AigErr::Format{..})));
  let fwd = r#"{"format":"aigdepth-aig-0.01","inputs":2,"ands":[null,["x0",2]],"outs":[]}"#;
  assert!(matches!(AigBase::load_json(fwd), Err(AigErr::BadRef(_))));
  let range = r#"{"format":"aigdepth-aig-0.01","inputs":2,"ands":[null,["x0","x2"]],"outs":[]}"#;
  assert!(matches!(AigBase::load_json(range), Err(AigErr::BadRef(_))));
  assert!(matches!(AigBase::load("/nonexistent/aig.json"), Err(AigErr::Io(_)))); }
