use super::*;
use pretty_assertions::assert_eq;

fn ast(name: &str) -> QualName {
    QualName::new("github.com/influxdata/flux/ast", name)
}

#[test]
fn scalar_names_round_trip() {
    for kind in ScalarKind::ALL {
        assert_eq!(ScalarKind::from_name(kind.name()), Some(kind));
    }
}

#[test]
fn scalar_aliases() {
    assert_eq!(ScalarKind::from_name("byte"), Some(ScalarKind::Uint8));
    assert_eq!(ScalarKind::from_name("rune"), Some(ScalarKind::Int32));
    assert_eq!(ScalarKind::from_name("Int"), None);
}

#[test]
fn visibility_follows_first_letter() {
    assert_eq!(Visibility::of_field_name("Name"), Visibility::Exported);
    assert_eq!(Visibility::of_field_name("name"), Visibility::Unexported);
    assert_eq!(Visibility::of_field_name("_x"), Visibility::Unexported);
    assert_eq!(Visibility::of_field_name(""), Visibility::Unexported);
}

#[test]
fn schema_from_names() {
    let schema = RecordSchema::from_names(["Loc", "Body", "cache"]);
    assert_eq!(schema.len(), 3);
    assert!(schema.fields()[0].visibility.is_exported());
    assert!(!schema.fields()[2].visibility.is_exported());
    assert_eq!(schema.position("Body"), Some(1));
    assert_eq!(schema.position("Missing"), None);
}

#[test]
fn kind_tags() {
    let int = TypeDesc::scalar(ScalarKind::Int);
    assert_eq!(int.kind_tag(), Kind::Scalar(ScalarKind::Int));
    assert_eq!(TypeDesc::slice(int.clone()).kind_tag(), Kind::Slice);
    assert_eq!(TypeDesc::array(int.clone(), 2).kind_tag(), Kind::Array);
    assert_eq!(TypeDesc::map(int.clone(), int.clone()).kind_tag(), Kind::Map);
    assert_eq!(TypeDesc::pointer(int).kind_tag(), Kind::Pointer);
    assert_eq!(TypeDesc::any().kind_tag(), Kind::Interface);
    assert_eq!(TypeDesc::func().kind_tag(), Kind::Func);
    assert_eq!(TypeDesc::chan().kind_tag(), Kind::Chan);
    assert_eq!(TypeDesc::unsafe_pointer().kind_tag(), Kind::UnsafePointer);
}

#[test]
fn named_type_keeps_underlying_shape() {
    let kind = TypeDesc::named(ast("OperatorKind"), &TypeDesc::scalar(ScalarKind::Int));
    assert_eq!(kind.kind(), &TypeKind::Scalar(ScalarKind::Int));
    assert_eq!(kind.name(), Some(&ast("OperatorKind")));
}

#[test]
fn descriptors_are_structurally_equal() {
    let build = || {
        TypeDesc::slice(TypeDesc::pointer(TypeDesc::record(
            ast("File"),
            RecordSchema::from_names(["Name", "Body"]),
        )))
    };
    assert_eq!(build(), build());
}

#[test]
fn display_uses_go_syntax() {
    let file = TypeDesc::record(ast("File"), RecordSchema::from_names(["Name"]));
    let string = TypeDesc::scalar(ScalarKind::String);
    assert_eq!(
        TypeDesc::slice(TypeDesc::pointer(file)).to_string(),
        "[]*github.com/influxdata/flux/ast.File"
    );
    assert_eq!(
        TypeDesc::map(string.clone(), TypeDesc::array(string, 3)).to_string(),
        "map[string][3]string"
    );
    assert_eq!(TypeDesc::any().to_string(), "interface{}");
}

#[test]
fn kind_display() {
    assert_eq!(Kind::Func.to_string(), "func");
    assert_eq!(Kind::Pointer.to_string(), "ptr");
    assert_eq!(Kind::Scalar(ScalarKind::Complex64).to_string(), "complex64");
    assert_eq!(Kind::UnsafePointer.to_string(), "unsafe.Pointer");
}

#[test]
fn qualified_names_parse_at_last_dot() {
    assert_eq!(
        QualName::parse("github.com/influxdata/flux/ast.Package"),
        QualName::new("github.com/influxdata/flux/ast", "Package")
    );
    assert_eq!(QualName::parse("math.Inf"), QualName::new("math", "Inf"));
    assert_eq!(QualName::parse("Local"), QualName::local("Local"));
    assert_eq!(
        QualName::parse("example.com/pkg"),
        QualName::local("example.com/pkg")
    );
}
