//! Favorite Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod index;

#[cfg(test)]
pub(crate) mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use sorveteria::{
        favorites::FavoritePot,
        pots::{Pot, Size},
    };
    use sorveteria_app::domain::{
        customers::records::CustomerUuid,
        favorites::records::{FavoriteRecord, FavoriteUuid},
    };

    pub(crate) fn make_favorite(uuid: FavoriteUuid, customer: CustomerUuid) -> FavoriteRecord {
        let pot = Pot::new(Size::Medium).flavor(Uuid::nil(), "Cupuaçu");

        FavoriteRecord {
            uuid,
            customer_uuid: customer,
            favorite: FavoritePot {
                name: "Meu de sempre".to_string(),
                size: pot.size(),
                price: pot.unit_price(),
                flavors: pot.flavors().clone(),
                additionals: pot.additionals().clone(),
            },
            created_at: Timestamp::UNIX_EPOCH,
        }
    }
}
