//! Conversion from protobuf descriptors to a [`SchemaTree`].
//!
//! Accepts the `FileDescriptorProto`s found in a `CodeGeneratorRequest` or a
//! `FileDescriptorSet`. Every file participates, imported dependencies
//! included, in the order protoc supplied them.

use prost::Message as _;
use prost_types::field_descriptor_proto::Type;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet, ServiceDescriptorProto,
};
use std::fmt;
use tracing::debug;

use crate::error::{CheckerError, CheckerResult};
use crate::schema::{Enum, Field, Message, Method, SchemaFile, SchemaTree, Service};

/// Where a file's language package is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PackageSource {
    /// `option go_package`
    #[default]
    Go,
    /// `option java_package`
    Java,
    /// The `package` statement
    Proto,
}

impl PackageSource {
    /// Parses a `language_package` value. An empty value keeps the default.
    pub fn from_param(value: &str) -> CheckerResult<Self> {
        match value {
            "" => Ok(Self::Go),
            "java" => Ok(Self::Java),
            "proto" => Ok(Self::Proto),
            _ => Err(CheckerError::invalid_argument(
                "unsupported language_package param. Should be one of: java, proto",
            )),
        }
    }

    /// The package this source yields for a file, empty if unset.
    pub fn package_of<'a>(&self, file: &'a FileDescriptorProto) -> &'a str {
        match self {
            Self::Go => file.options.as_ref().map_or("", |o| o.go_package()),
            Self::Java => file.options.as_ref().map_or("", |o| o.java_package()),
            Self::Proto => file.package(),
        }
    }

    fn option_name(&self) -> &'static str {
        match self {
            Self::Go => "go_package",
            Self::Java => "java_package",
            Self::Proto => "package",
        }
    }
}

impl fmt::Display for PackageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

/// Fails on the first file without a language package for `source`.
pub fn ensure_language_packages(
    files: &[FileDescriptorProto],
    source: PackageSource,
) -> CheckerResult<()> {
    for file in files {
        if source.package_of(file).is_empty() {
            return Err(CheckerError::missing_package(file.name(), source.to_string()));
        }
    }
    Ok(())
}

/// Decodes a serialized `FileDescriptorSet`.
pub fn decode_descriptor_set(bytes: &[u8]) -> CheckerResult<FileDescriptorSet> {
    FileDescriptorSet::decode(bytes).map_err(|e| CheckerError::decode("descriptor set", e))
}

/// Builds a schema tree from descriptors, preserving file and declaration order.
pub fn tree_from_files(files: &[FileDescriptorProto]) -> SchemaTree {
    let files = files.iter().map(convert_file).collect::<Vec<_>>();
    debug!(files = files.len(), "schema tree built");
    SchemaTree::new(files)
}

fn convert_file(file: &FileDescriptorProto) -> SchemaFile {
    let package = file.package();
    SchemaFile {
        name: file.name().to_string(),
        package: package.to_string(),
        services: file.service.iter().map(convert_service).collect(),
        messages: file
            .message_type
            .iter()
            .map(|m| convert_message(package, m))
            .collect(),
        enums: file
            .enum_type
            .iter()
            .map(|e| convert_enum(package, e))
            .collect(),
    }
}

fn convert_service(service: &ServiceDescriptorProto) -> Service {
    Service {
        name: service.name().to_string(),
        methods: service
            .method
            .iter()
            .map(|m| Method {
                name: m.name().to_string(),
                input_type: strip_leading_dot(m.input_type()).to_string(),
                output_type: strip_leading_dot(m.output_type()).to_string(),
            })
            .collect(),
    }
}

fn convert_message(scope: &str, message: &DescriptorProto) -> Message {
    let full_name = qualify(scope, message.name());
    Message {
        fields: message.field.iter().map(convert_field).collect(),
        messages: message
            .nested_type
            .iter()
            .map(|m| convert_message(&full_name, m))
            .collect(),
        enums: message
            .enum_type
            .iter()
            .map(|e| convert_enum(&full_name, e))
            .collect(),
        map_entry: message.options.as_ref().is_some_and(|o| o.map_entry()),
        full_name,
    }
}

fn convert_enum(scope: &str, value: &EnumDescriptorProto) -> Enum {
    Enum::new(qualify(scope, value.name()))
}

fn convert_field(field: &FieldDescriptorProto) -> Field {
    let type_name = field
        .type_name
        .as_deref()
        .map(|t| strip_leading_dot(t).to_string());
    match field.r#type() {
        Type::Message | Type::Group => Field {
            name: field.name().to_string(),
            message_type: type_name,
            enum_type: None,
        },
        Type::Enum => Field {
            name: field.name().to_string(),
            message_type: None,
            enum_type: type_name,
        },
        _ => Field::scalar(field.name()),
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

fn strip_leading_dot(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}
