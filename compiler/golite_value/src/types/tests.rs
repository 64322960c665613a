use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn builtin_names_resolve() {
    assert_eq!(builtin_type("int"), Some(&Type::INT));
    assert_eq!(builtin_type("byte"), Some(&Type::Uint(UintKind::Uint8)));
    assert_eq!(builtin_type("rune"), Some(&Type::Int(IntKind::Int32)));
    assert_eq!(builtin_type("any"), Some(&Type::Any));
    assert_eq!(builtin_type("Point"), None);
}

#[test]
fn composite_types_print_like_source() {
    let ty = Type::map(Type::String, Type::slice(Type::pointer(Type::INT)));
    assert_eq!(ty.to_string(), "map[string][]*int");
    assert_eq!(Type::chan(Type::Bool).to_string(), "chan bool");
    assert_eq!(Type::Any.to_string(), "interface {}");
}

#[test]
fn anonymous_struct_prints_fields() {
    let st = StructType::new(vec![
        StructField {
            name: "a".into(),
            ty: Type::INT,
        },
        StructField {
            name: "b".into(),
            ty: Type::String,
        },
    ]);
    assert_eq!(st.into_type().to_string(), "struct { a int; b string }");
    assert_eq!(StructType::new(vec![]).into_type().to_string(), "struct {}");
}

#[test]
fn named_structs_compare_by_name_and_shape() {
    let fields = vec![StructField {
        name: "X".into(),
        ty: Type::INT,
    }];
    let p = StructType::named("P", fields.clone());
    let q = StructType::named("Q", fields.clone());
    assert_ne!(p, q);
    assert_eq!(p, p.renamed("P"));
    assert_eq!(StructType::new(fields.clone()), StructType::new(fields));
    assert_eq!(p.field_index("X"), Some(0));
    assert_eq!(p.field_index("Y"), None);
}

#[test]
fn struct_type_through_pointer() {
    let st = StructType::named("P", vec![]).into_type();
    let ptr = Type::pointer(st.clone());
    assert!(ptr.struct_type().is_some());
    assert_eq!(st.struct_type(), ptr.struct_type());
    assert!(Type::INT.struct_type().is_none());
}

#[test]
fn elem_of_containers() {
    assert_eq!(Type::slice(Type::String).elem(), Some(&Type::String));
    assert_eq!(Type::map(Type::String, Type::BYTE).elem(), Some(&Type::BYTE));
    assert_eq!(Type::Bool.elem(), None);
}

#[test]
fn float32_rounding() {
    assert_eq!(FloatKind::F32.round(0.1), f64::from(0.1f32));
    assert_eq!(FloatKind::F64.round(0.1), 0.1);
}

proptest! {
    #[test]
    fn wrap_agrees_with_fits(v in any::<i64>()) {
        for kind in [IntKind::Int8, IntKind::Int16, IntKind::Int32, IntKind::Int64] {
            let wrapped = kind.wrap(v);
            prop_assert!(kind.fits(i128::from(wrapped)));
            prop_assert_eq!(wrapped == v, kind.fits(i128::from(v)));
        }
    }

    #[test]
    fn unsigned_wrap_fits(v in any::<u64>()) {
        for kind in [UintKind::Uint8, UintKind::Uint16, UintKind::Uint32, UintKind::Uint64] {
            prop_assert!(kind.fits(i128::from(kind.wrap(v))));
        }
    }
}
