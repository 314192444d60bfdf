//! In-memory schema tree: files, services, messages, enums and fields.
//!
//! Types are identified only by their fully-qualified dotted name
//! (`pkg.Outer.Inner`), never by structure. The tree is built once (see
//! [`crate::descriptor`]) and is read-only input to the analysis.

/// Ordered collection of schema files.
///
/// File order and declaration order within a file determine report order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTree {
    pub files: Vec<SchemaFile>,
}

/// A single `.proto` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaFile {
    /// File path as reported by protoc (e.g. `api/v1/service.proto`)
    pub name: String,
    /// Proto package, empty if the file declares none
    pub package: String,
    pub services: Vec<Service>,
    /// Top-level messages in declaration order
    pub messages: Vec<Message>,
    /// Top-level enums in declaration order
    pub enums: Vec<Enum>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub methods: Vec<Method>,
}

/// An RPC method. Input and output are fully-qualified message names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
}

/// A message declaration with its nested declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub full_name: String,
    pub fields: Vec<Field>,
    /// Nested messages, including synthetic map entries
    pub messages: Vec<Message>,
    /// Nested enums
    pub enums: Vec<Enum>,
    /// Compiler-generated entry type backing a `map<K, V>` field
    pub map_entry: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enum {
    pub full_name: String,
}

/// A message field. At most one of the two references is expected to be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub message_type: Option<String>,
    pub enum_type: Option<String>,
}

impl SchemaTree {
    pub fn new(files: Vec<SchemaFile>) -> Self {
        Self { files }
    }

    /// Root type names: input then output of every method, in file,
    /// service and method order.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .flat_map(|f| &f.services)
            .flat_map(|s| &s.methods)
            .flat_map(|m| [m.input_type.as_str(), m.output_type.as_str()])
    }

    /// Visits every declared message (map entries included) depth-first.
    pub fn for_each_message<'a>(&'a self, mut f: impl FnMut(&'a Message)) {
        fn walk<'a>(message: &'a Message, f: &mut impl FnMut(&'a Message)) {
            f(message);
            for nested in &message.messages {
                walk(nested, &mut *f);
            }
        }
        for file in &self.files {
            for message in &file.messages {
                walk(message, &mut f);
            }
        }
    }

    /// Visits every declared enum, top-level and nested.
    pub fn for_each_enum<'a>(&'a self, mut f: impl FnMut(&'a Enum)) {
        self.for_each_message(|m| m.enums.iter().for_each(&mut f));
        for file in &self.files {
            file.enums.iter().for_each(&mut f);
        }
    }

    /// Number of declared messages and enums at every nesting level.
    pub fn declared_count(&self) -> usize {
        let mut count = 0;
        self.for_each_message(|m| count += 1 + m.enums.len());
        count + self.files.iter().map(|f| f.enums.len()).sum::<usize>()
    }
}

impl SchemaFile {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_enum(mut self, full_name: impl Into<String>) -> Self {
        self.enums.push(Enum::new(full_name));
        self
    }
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(
        mut self,
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
    ) -> Self {
        self.methods.push(Method {
            name: name.into(),
            input_type: input_type.into(),
            output_type: output_type.into(),
        });
        self
    }
}

impl Message {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    /// A synthetic map entry with `key` and `value` fields.
    pub fn map_entry(full_name: impl Into<String>, value: Field) -> Self {
        Self {
            full_name: full_name.into(),
            fields: vec![Field::scalar("key"), Field { name: "value".into(), ..value }],
            map_entry: true,
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_enum(mut self, full_name: impl Into<String>) -> Self {
        self.enums.push(Enum::new(full_name));
        self
    }

    /// Names of the message and enum types referenced by this message's fields.
    pub fn referenced_types(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().flat_map(|f| {
            f.message_type
                .as_deref()
                .into_iter()
                .chain(f.enum_type.as_deref())
        })
    }
}

impl Enum {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }
}

impl Field {
    /// A field whose value has no message or enum type.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn message(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message_type: Some(type_name.into()),
            enum_type: None,
        }
    }

    pub fn enumeration(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message_type: None,
            enum_type: Some(type_name.into()),
        }
    }
}
