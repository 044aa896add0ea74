use serde_json::Value;

use crate::domain::Field;

/// One projected country row. Every field is optional, upstream data is not trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: Option<i64>,
}

/// Borrowed, typed view of a single record field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(i64),
    Text(&'a str),
    Missing,
}

impl Record {
    /// Projects an upstream object onto the record schema.
    ///
    /// Unknown keys are dropped. Missing keys and values of the wrong JSON
    /// type become `None`. Anything that is not an object yields an empty record.
    pub fn project(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Record::default();
        };
        let text = |field: Field| {
            object
                .get(field.key())
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let population = object.get(Field::Population.key()).and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
                .or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        });

        Record {
            name: text(Field::Name),
            capital: text(Field::Capital),
            region: text(Field::Region),
            subregion: text(Field::Subregion),
            population,
        }
    }

    pub fn get(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Name => text_value(&self.name),
            Field::Capital => text_value(&self.capital),
            Field::Region => text_value(&self.region),
            Field::Subregion => text_value(&self.subregion),
            Field::Population => match self.population {
                Some(p) => FieldValue::Number(p),
                None => FieldValue::Missing,
            },
        }
    }

    /// Text shown in a table cell. Missing values render empty.
    pub fn display(&self, field: Field) -> String {
        match self.get(field) {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.to_string(),
            FieldValue::Missing => String::new(),
        }
    }
}

fn text_value(value: &Option<String>) -> FieldValue<'_> {
    match value {
        Some(s) => FieldValue::Text(s),
        None => FieldValue::Missing,
    }
}
