/// Fields whose proto name differs from the lowerCamelCase JSON name; the
/// proto name is accepted on input as well.
const SNAKE_CASE_FIELDS: &[&str] = &[
    ".memo.Memo.owner_id",
    ".memo.Memo.created_at",
    ".memo.ListMemosRequest.owner_id",
    ".memo.GetMemoRequest.owner_id",
    ".memo.GetMemoRequest.memo_id",
    ".memo.CreateMemoRequest.user_id",
    ".memo.UpdateMemoRequest.user_id",
];

fn build_protobuf(protos: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    for proto in protos {
        println!("cargo::rerun-if-changed={proto}");
    }
    let descriptors = protox::compile(protos, ["proto"])?;

    let mut config = prost_build::Config::new();
    config
        .type_attribute(
            ".memo",
            "#[derive(serde::Deserialize, serde::Serialize)]\n\
             #[serde(default, rename_all = \"camelCase\")]",
        )
        .field_attribute(
            ".memo",
            "#[serde(deserialize_with = \"crate::json::null_as_default\")]",
        );
    for field in SNAKE_CASE_FIELDS {
        let name = field.rsplit('.').next().unwrap_or_default();
        config.field_attribute(field, format!("#[serde(alias = \"{name}\")]"));
    }
    config.compile_fds(descriptors)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    build_protobuf(&["proto/memo.proto"])
}
