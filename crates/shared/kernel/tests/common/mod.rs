#![allow(dead_code)]

use porter_kernel::prelude::*;
use serde::Serialize;

/// Keeps whatever the engine received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestData {
    #[serde(skip)]
    pub flags: Flags,
    #[serde(flatten)]
    pub source: SourceMap,
}

impl Dto for RequestData {
    fn construct(source: SourceMap, hydration: &Hydration) -> Result<Self, HydrationError> {
        Ok(Self { flags: hydration.flags(), source })
    }
}

/// A typed DTO with a small engine that honors the flags it is given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserData {
    pub name: Option<String>,
    pub age: Option<i64>,
    #[serde(skip)]
    pub flags: Flags,
}

impl Dto for UserData {
    fn construct(mut source: SourceMap, hydration: &Hydration) -> Result<Self, HydrationError> {
        let name = match take(&mut source, "name", hydration)? {
            None => None,
            Some(Value::String(name)) => Some(name),
            Some(Value::Number(n)) if hydration.casts_primitives() => Some(n.to_string()),
            Some(_) => return Err(HydrationError::cast("name", "string")),
        };

        let age = match take(&mut source, "age", hydration)? {
            None => None,
            Some(Value::Number(n)) => {
                Some(n.as_i64().ok_or_else(|| HydrationError::cast("age", "integer"))?)
            }
            Some(Value::String(s)) if hydration.casts_primitives() => {
                Some(s.parse().map_err(|_| HydrationError::cast("age", "integer"))?)
            }
            Some(_) => return Err(HydrationError::cast("age", "integer")),
        };

        if !hydration.ignores_unknown_properties()
            && let Some(unknown) = source.keys().next()
        {
            return Err(HydrationError::unknown(unknown.clone()));
        }

        Ok(Self { name, age, flags: hydration.flags() })
    }
}

fn take(
    source: &mut SourceMap,
    property: &'static str,
    hydration: &Hydration,
) -> Result<Option<Value>, HydrationError> {
    let value = hydration.resolve(property, source.remove(property).unwrap_or(Value::Null));
    if value.is_null() {
        return if hydration.is_partial() {
            Ok(None)
        } else {
            Err(HydrationError::missing(property))
        };
    }
    Ok(Some(value))
}

/// A DTO that is always mutable.
#[derive(Debug)]
pub struct MutableData(pub Flags);

impl Dto for MutableData {
    const DEFAULT_FLAGS: Flags = Flags::MUTABLE;

    fn construct(_: SourceMap, hydration: &Hydration) -> Result<Self, HydrationError> {
        Ok(Self(hydration.flags()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TestRequest(pub SourceMap);

impl TestRequest {
    pub fn with(fields: Value) -> Self {
        Self(fields.as_object().cloned().unwrap_or_default())
    }
}

impl Request for TestRequest {
    fn all_fields(&self) -> SourceMap {
        self.0.clone()
    }
}

request_source!(TestRequest);

/// A persisted user whose age column is stored as text.
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub age: String,
}

impl Record for User {
    fn attributes(&self) -> SourceMap {
        let mut attributes = SourceMap::new();
        attributes.insert("id".to_owned(), self.id.into());
        attributes.insert("name".to_owned(), self.name.clone().into());
        attributes.insert("age".to_owned(), self.age.clone().into());
        attributes
    }
}

record_source!(User);

pub fn user() -> User {
    User { id: 1, name: "foo".to_owned(), age: "42".to_owned() }
}

#[derive(Debug)]
pub struct TestJsonable(pub Value);

impl Jsonable for TestJsonable {
    fn to_json(&self) -> String {
        self.0.to_string()
    }
}

impl SourceShape for TestJsonable {
    fn as_jsonable(&self) -> Option<&dyn Jsonable> {
        Some(self)
    }
}

#[derive(Debug)]
pub struct TestJsonSerializable(pub Value);

impl JsonSerializable for TestJsonSerializable {
    fn json_serialize(&self) -> Value {
        self.0.clone()
    }
}

impl SourceShape for TestJsonSerializable {
    fn as_json_serializable(&self) -> Option<&dyn JsonSerializable> {
        Some(self)
    }
}

/// Resolves `name` to a fixed qualifier, standing in for an injected service.
#[derive(Debug)]
pub struct QualifierListener {
    pub qualifier: String,
}

impl Listener for QualifierListener {
    fn resolve(&self, property: &str, value: Value) -> Value {
        if property == "name" { Value::String(self.qualifier.clone()) } else { value }
    }
}
