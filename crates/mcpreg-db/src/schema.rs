diesel::table! {
    servers (id) {
        id -> Integer,
        developer -> Text,
        name -> Text,
        full_name -> Text,
        description -> Nullable<Text>,
        status -> Nullable<Text>,
        version -> Nullable<Text>,
        server_type -> Text,
        registry_id -> Nullable<Text>,
        published_at -> Nullable<Text>,
        updated_at -> Nullable<Text>,
        is_latest -> Nullable<Bool>,
    }
}

diesel::table! {
    repositories (id) {
        id -> Integer,
        server_id -> Integer,
        url -> Nullable<Text>,
        source -> Nullable<Text>,
        subfolder -> Nullable<Text>,
        repo_id -> Nullable<Text>,
    }
}

diesel::joinable!(repositories -> servers (server_id));

diesel::allow_tables_to_appear_in_same_query!(servers, repositories,);
