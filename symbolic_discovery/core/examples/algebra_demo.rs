//! Demonstration of the algebra and search modules
//!
//! Run with: cargo run --example algebra_demo

use symbolic_discovery_core::*;

fn main() {
    println!("=== Symbolic Discovery Algebra Demo ===\n");

    // 1. Symbol Table Demo
    println!("1. Symbol Declarations:");
    let symbols = SymbolTable::new();
    let [m, v, h] = [
        symbols.declare("m", SymbolKind::Quantity),
        symbols.declare("v", SymbolKind::Quantity),
        symbols.declare("h", SymbolKind::Quantity),
    ];
    let g = symbols.declare("g", SymbolKind::Constant);
    println!("   Declared: {}", symbols.labels_of_kind(SymbolKind::Quantity).join(", "));
    println!("   Total symbols: {}\n", symbols.len());

    // 2. Equation Demo
    println!("2. Energy Balance:");
    let kinetic = Expr::rational(1, 2) * m.clone() * v.clone().powi(2);
    let potential = m.clone() * g.clone() * h.clone();
    let balance = Equation::new(kinetic, potential);
    println!("   {}", balance);

    // 3. Solve Demo
    println!("\n3. Solve for h:");
    match balance.solve_for(&h) {
        Ok(solved) => {
            println!("   {}", solved);
            match solved.rhs.evaluate_with(&[("v", 10.0), ("g", 9.81)]) {
                Ok(height) => println!("   h(v = 10, g = 9.81) = {:.3}", height),
                Err(e) => println!("   Evaluation failed: {}", e),
            }
        }
        Err(e) => println!("   Solve failed: {}", e),
    }

    // 4. Calculus Demo
    println!("\n4. Calculus:");
    let x = Expr::symbol("x");
    let f = x.clone().powi(3) + (Expr::int(2) * x.clone()).sin();
    println!("   f(x) = {}", f);
    println!("   f'(x) = {}", f.diff("x"));
    match f.integrate("x") {
        Some(antiderivative) => println!("   Integral(f, x) = {}", antiderivative),
        None => println!("   Integral(f, x) left unevaluated"),
    }

    // 5. Derivation Trace Demo
    println!("\n5. Derivation Trace:");
    let mut trace = DerivationTrace::new("free fall");
    trace.add_metadata("demo", "algebra");
    let axiom = trace.record(Operation::Axiom, "energy balance", &balance);
    if let Ok(solved) = balance.solve_for(&h) {
        trace.record_from(Operation::Solve, "solve for h", &[axiom], &solved);
        trace.conclude(solved.to_string());
    }
    for step in &trace.steps {
        println!("   {} [{}] {}", step.id, step.operation, step.result);
    }

    match trace.to_json() {
        Ok(json) => println!("   Serialized trace ({} bytes)", json.len()),
        Err(e) => println!("   Serialization failed: {}", e),
    }

    // 6. Constant Search Demo
    println!("\n6. Constant Search:");
    match ConstantMatcher::default().search(&ConstantTable::builtin()) {
        Ok(result) => {
            println!("   Candidates evaluated: {}", result.candidates_evaluated);
            for found in &result.discoveries {
                println!("   {} ~ {} (error {:.5})", result.target, found.expression, found.error);
            }
        }
        Err(e) => println!("   Search failed: {}", e),
    }

    println!("\n=== Demo Complete ===");
}
