use anyhow::anyhow;

/// Whether an in-memory driven port should behave as if its backing system is reachable
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Fails the way a real adapter would if the store went away
    pub fn blow_up_if_disconnected(&self) -> Result<(), anyhow::Error> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(anyhow!("could not reach the todo store!")),
        }
    }
}

/// Records the arguments of every call to a faked async trait method and hands back a
/// preconfigured result. Async trait methods don't play well with mocking crates, so mocks in
/// this crate hold one of these per method.
///
/// ```ignore
/// struct MockTodoService {
///     todo_by_id_result: FakeImplementation<i32, Result<TodoItem, TodoError>>,
/// }
///
/// impl TodoPort for Mutex<MockTodoService> {
///     async fn todo_by_id(&self, todo_id: i32, /* ... */) -> Result<TodoItem, TodoError> {
///         let mut locked_self = self.lock().unwrap();
///         locked_self.todo_by_id_result.save_arguments(todo_id);
///         locked_self.todo_by_id_result.return_value_result()
///     }
/// }
/// ```
pub struct FakeImplementation<Args, Ret> {
    saved_arguments: Vec<Args>,
    return_value: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            saved_arguments: Vec::new(),
            return_value: None,
        }
    }

    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Arguments from every invocation, oldest first
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }
}

impl<Args, Success, Fail> FakeImplementation<Args, Result<Success, Fail>>
where
    Success: Clone,
    Fail: Clone,
{
    pub fn set_returned_result(&mut self, return_value: Result<Success, Fail>) {
        self.return_value = Some(return_value)
    }

    pub fn return_value_result(&self) -> Result<Success, Fail> {
        match self.return_value {
            Some(Ok(ref ok_result)) => Ok(ok_result.clone()),
            Some(Err(ref err)) => Err(err.clone()),
            None => panic!("Tried to return from a function where the return value wasn't set!"),
        }
    }
}
