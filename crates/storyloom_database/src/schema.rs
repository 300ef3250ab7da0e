//! Diesel table definitions for the record store.

diesel::table! {
    topics (id) {
        id -> Integer,
        query -> Text,
        start_timestamp -> Nullable<BigInt>,
        active -> Bool,
        search_volume -> Nullable<BigInt>,
        increase_percentage -> Nullable<BigInt>,
        categories -> Text,
        trend_breakdown -> Text,
        trends_link -> Nullable<Text>,
        news_token -> Nullable<Text>,
        news_link -> Nullable<Text>,
        batch_date -> Text,
    }
}

diesel::table! {
    images (id) {
        id -> Integer,
        file_name -> Text,
    }
}

diesel::table! {
    narratives (id) {
        id -> Integer,
        body -> Text,
        created_date -> Text,
        topic_id -> Integer,
        image_id -> Nullable<Integer>,
    }
}

diesel::joinable!(narratives -> topics (topic_id));
diesel::joinable!(narratives -> images (image_id));

diesel::allow_tables_to_appear_in_same_query!(topics, images, narratives);
