use pretty_assertions::assert_eq;

use super::*;

#[test]
fn plain_imports_bind_first_segment_or_alias() {
    let module = parse("import os.path\nimport json as j\n");
    let StmtKind::Import(aliases) = &module.body[0].kind else {
        panic!("expected import");
    };
    assert_eq!(aliases[0].bound_name(), "os");
    let StmtKind::Import(aliases) = &module.body[1].kind else {
        panic!("expected import");
    };
    assert_eq!(aliases[0].bound_name(), "j");
}

#[test]
fn relative_from_imports_record_level() {
    let module = parse("from ._impl import Klass as K, helper\nfrom .. import sibling\nfrom pkg.mod import *\n");
    let StmtKind::ImportFrom(first) = &module.body[0].kind else {
        panic!("expected from-import");
    };
    assert_eq!(first.level, 1);
    assert_eq!(first.module, "_impl");
    assert_eq!(
        first.names,
        vec![
            ImportAlias {
                name: "Klass".into(),
                asname: Some("K".into())
            },
            ImportAlias {
                name: "helper".into(),
                asname: None
            },
        ]
    );

    let StmtKind::ImportFrom(second) = &module.body[1].kind else {
        panic!("expected from-import");
    };
    assert_eq!((second.level, second.module.as_str()), (2, ""));
    assert_eq!(second.names[0].name, "sibling");

    let StmtKind::ImportFrom(third) = &module.body[2].kind else {
        panic!("expected from-import");
    };
    assert!(third.star);
    assert_eq!(third.module, "pkg.mod");
}
