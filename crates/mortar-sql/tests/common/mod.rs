use mortar_core::schema::{Attribute, Model, Type};
use mortar_core::Schema;

pub fn schema() -> Schema {
    Schema::builder()
        .model(
            Model::new("user", "users")
                .attribute(Attribute::new("id", Type::Number).auto_increment())
                .attribute(Attribute::new("name", Type::String))
                .attribute(Attribute::new("age", Type::Number))
                .attribute(Attribute::new("email", Type::String).column("email_address"))
                .attribute(Attribute::new("active", Type::Boolean)),
        )
        .model(
            Model::new("pet", "pets")
                .attribute(Attribute::new("id", Type::Number).auto_increment())
                .attribute(Attribute::new("name", Type::String))
                .attribute(Attribute::new("owner", Type::Number).column("owner_id")),
        )
        .model(
            Model::new("team", "teams")
                .attribute(Attribute::new("id", Type::Number).auto_increment())
                .attribute(Attribute::new("name", Type::String)),
        )
        .model(
            Model::new("membership", "memberships")
                .attribute(Attribute::new("id", Type::Number).auto_increment())
                .attribute(Attribute::new("user", Type::Number).column("user_id"))
                .attribute(Attribute::new("team", Type::Number).column("team_id")),
        )
        .build()
        .unwrap()
}
