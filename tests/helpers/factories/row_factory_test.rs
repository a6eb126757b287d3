use super::row_factory::RowFactory;
use crate::engine::types::ScalarValue;

#[test]
fn builds_row_with_columns_in_order() {
    let row = RowFactory::new()
        .with_id(7)
        .with("name", "ada")
        .create();

    assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name"]);
    assert_eq!(row.get("name"), &ScalarValue::Utf8("ada".into()));
}

#[test]
fn ids_round_trip_through_id_values() {
    let rows = RowFactory::ids(&[3, 1, 2]);
    assert_eq!(RowFactory::id_values(&rows), vec![3, 1, 2]);
}
