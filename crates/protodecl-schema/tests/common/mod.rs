//! Descriptor-set fixtures shared by the integration tests.
//!
//! Sets are built with `prost-types` and serialized with
//! `prost::Message::encode_to_vec`, the same bytes `protoc
//! --descriptor_set_out` would produce for the equivalent `.proto` files.

#![allow(dead_code)]

use std::sync::Arc;

use prost::Message as _;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet, MessageOptions,
};
use protodecl_schema::{lower_camel_case, CodecOptions, DescriptorDatabase};

pub fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.into()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        json_name: Some(lower_camel_case(name)),
        ..Default::default()
    }
}

pub fn typed(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.into()),
        ..scalar(name, number, ty)
    }
}

pub fn repeated(field: FieldDescriptorProto) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        ..field
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.into()),
        field: fields,
        ..Default::default()
    }
}

pub fn map_entry(name: &str, key: Type, value: FieldDescriptorProto) -> DescriptorProto {
    DescriptorProto {
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..message(name, vec![scalar("key", 1, key), value])
    }
}

pub fn enumeration(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.into()),
        value: values
            .iter()
            .map(|(n, v)| EnumValueDescriptorProto {
                name: Some((*n).into()),
                number: Some(*v),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub fn file(
    name: &str,
    package: &str,
    messages: Vec<DescriptorProto>,
    enums: Vec<EnumDescriptorProto>,
) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.into()),
        package: Some(package.into()),
        message_type: messages,
        enum_type: enums,
        syntax: Some("proto3".into()),
        ..Default::default()
    }
}

pub fn encode_set(files: Vec<FileDescriptorProto>) -> Vec<u8> {
    FileDescriptorSet { file: files }.encode_to_vec()
}

/// `test.proto`: one message exercising every field kind.
///
/// ```proto
/// package test;
/// enum Enum { VALUE_0 = 0; VALUE_1 = 1; VALUE_2 = 2; }
/// message Message {
///   message Child { string name = 1; int32 value = 2; }
///   int32 int32 = 1;
///   string string = 14;
///   int64 int64 = 2;
///   bool bool = 3;
///   double double = 4;
///   bytes bytes = 5;
///   Enum enum = 6;
///   repeated int32 repeated_int32 = 7;
///   repeated string repeated_string = 8;
///   Child child = 9;
///   repeated Child children = 10;
///   map<string, string> string_to_string = 11;
///   map<int64, Child> int64_to_child = 12;
///   sint32 sint32 = 13;
///   float float = 15;
///   uint64 uint64 = 16;
///   fixed32 fixed32 = 17;
///   repeated Enum repeated_enum = 19;
/// }
/// ```
pub fn test_file() -> FileDescriptorProto {
    let child = message(
        "Child",
        vec![scalar("name", 1, Type::String), scalar("value", 2, Type::Int32)],
    );
    let mut msg = message(
        "Message",
        vec![
            scalar("int32", 1, Type::Int32),
            scalar("string", 14, Type::String),
            scalar("int64", 2, Type::Int64),
            scalar("bool", 3, Type::Bool),
            scalar("double", 4, Type::Double),
            scalar("bytes", 5, Type::Bytes),
            typed("enum", 6, Type::Enum, ".test.Enum"),
            repeated(scalar("repeated_int32", 7, Type::Int32)),
            repeated(scalar("repeated_string", 8, Type::String)),
            typed("child", 9, Type::Message, ".test.Message.Child"),
            repeated(typed("children", 10, Type::Message, ".test.Message.Child")),
            repeated(typed("string_to_string", 11, Type::Message, ".test.Message.StringToStringEntry")),
            repeated(typed("int64_to_child", 12, Type::Message, ".test.Message.Int64ToChildEntry")),
            scalar("sint32", 13, Type::Sint32),
            scalar("float", 15, Type::Float),
            scalar("uint64", 16, Type::Uint64),
            scalar("fixed32", 17, Type::Fixed32),
            repeated(typed("repeated_enum", 19, Type::Enum, ".test.Enum")),
        ],
    );
    msg.nested_type = vec![
        child,
        map_entry("StringToStringEntry", Type::String, scalar("value", 2, Type::String)),
        map_entry(
            "Int64ToChildEntry",
            Type::Int64,
            typed("value", 2, Type::Message, ".test.Message.Child"),
        ),
    ];
    file(
        "test.proto",
        "test",
        vec![msg],
        vec![enumeration("Enum", &[("VALUE_0", 0), ("VALUE_1", 1), ("VALUE_2", 2)])],
    )
}

/// `cycle.proto`: `A` and `B` reference each other.
pub fn cycle_file() -> FileDescriptorProto {
    file(
        "cycle.proto",
        "test.cycle",
        vec![
            message(
                "A",
                vec![
                    typed("b", 1, Type::Message, ".test.cycle.B"),
                    scalar("n", 2, Type::Int32),
                ],
            ),
            message(
                "B",
                vec![
                    typed("a", 1, Type::Message, ".test.cycle.A"),
                    repeated(typed("others", 2, Type::Message, ".test.cycle.B")),
                ],
            ),
        ],
        vec![],
    )
}

/// Serialized set holding `test.proto` and `cycle.proto`.
pub fn test_schema() -> Vec<u8> {
    encode_set(vec![test_file(), cycle_file()])
}

pub fn resolved_with(buffer: &[u8], options: CodecOptions) -> Arc<DescriptorDatabase> {
    let mut db = DescriptorDatabase::with_options(options);
    db.add_file_descriptor_set(buffer).expect("fixture schema ingests");
    db.resolve();
    Arc::new(db)
}

pub fn resolved(buffer: &[u8]) -> Arc<DescriptorDatabase> {
    resolved_with(buffer, CodecOptions::default())
}
