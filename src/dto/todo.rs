use crate::domain;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// DTO for a todo returned from the API or rendered into a page
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct TodoItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = false)]
    pub complete: bool,
}

impl From<domain::todo::TodoItem> for TodoItem {
    fn from(value: domain::todo::TodoItem) -> Self {
        TodoItem {
            id: value.id,
            title: value.title,
            complete: value.complete,
        }
    }
}

/// DTO for creating a todo via the API. A `title` which isn't a string is treated as missing.
#[derive(Deserialize, ToSchema)]
pub struct NewTodo {
    #[serde(default, deserialize_with = "string_or_none")]
    #[schema(example = "Buy milk")]
    pub title: Option<String>,
}

impl From<NewTodo> for domain::todo::NewTodo {
    fn from(value: NewTodo) -> Self {
        domain::todo::NewTodo {
            title: value.title.unwrap_or_default(),
        }
    }
}

/// DTO for replacing a todo's content via the API. `complete` only counts when it's an actual
/// JSON boolean; anything else leaves the stored value alone.
#[derive(Deserialize, ToSchema)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "string_or_none")]
    #[schema(example = "Buy milk")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "bool_or_none")]
    #[schema(example = true)]
    pub complete: Option<bool>,
}

/// The API always replaces the title, so a missing one goes through validation as empty
impl From<UpdateTodo> for domain::todo::TodoUpdate {
    fn from(value: UpdateTodo) -> Self {
        domain::todo::TodoUpdate {
            title: Some(value.title.unwrap_or_default()),
            complete: value.complete,
        }
    }
}

/// DTO confirming a todo was deleted
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct DeleteResult {
    #[schema(example = true)]
    pub result: bool,
}

/// Form submitted by the page's add and edit forms
#[derive(Deserialize, Debug, Default)]
pub struct TitleForm {
    pub title: Option<String>,
}

fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(title) => Ok(Some(title)),
        _ => Ok(None),
    }
}

fn bool_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool())
}
