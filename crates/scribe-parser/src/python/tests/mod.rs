use super::*;

mod definitions;
mod imports;
mod statements;

fn parse(source: &str) -> PyModule {
    PyModule::parse(source).expect("source should parse")
}

fn class<'a>(module: &'a PyModule, name: &str) -> &'a ClassDef {
    module
        .body
        .iter()
        .find_map(|stmt| match &stmt.kind {
            StmtKind::ClassDef(class) if class.name == name => Some(class),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no class named '{name}' found"))
}

fn function<'a>(body: &'a [Stmt], name: &str) -> &'a FunctionDef {
    body.iter()
        .find_map(|stmt| match &stmt.kind {
            StmtKind::FunctionDef(function) if function.name == name => Some(function),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no function named '{name}' found"))
}
