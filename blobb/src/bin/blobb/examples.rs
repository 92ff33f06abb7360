use crate::commands::{graph, user};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "user",
            groups: user::EXAMPLES,
        },
        CommandExample {
            name: "follow",
            groups: graph::FOLLOW_EXAMPLES,
        },
        CommandExample {
            name: "following",
            groups: graph::LIST_EXAMPLES,
        },
        CommandExample {
            name: "followers",
            groups: graph::LIST_EXAMPLES,
        },
    ]
}
