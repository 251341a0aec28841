use tacli::ir;

pub fn run_pipeline(src: &str) -> ir::Program {
    let syntax = tacli::parse(src).expect("parsing failed");
    let mut program = tacli::resolve(&syntax).expect("resolution failed");
    tacli::translate(&mut program).expect("translation failed")
}
