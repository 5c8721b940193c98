use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{LadderListItem, LadderResponse, MemberListItem};
use crate::rating::Rank;

use super::AppState;

pub async fn get_ladder(
    State(state): State<Arc<AppState>>,
    Path(division): Path<String>,
) -> impl IntoResponse {
    let Some(division) = state.config.ladder.division(&division) else {
        return (StatusCode::NOT_FOUND, format!("Unknown division: {division}")).into_response();
    };

    let mut players = match state.players.list(division.collection).await {
        Ok(players) => players,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {e}"))
                .into_response()
        }
    };

    let default_rating = state.config.rating.default_rating;
    players.sort_by(|(a_id, a), (b_id, b)| {
        let a_elo = a.elo_rating.unwrap_or(default_rating);
        let b_elo = b.elo_rating.unwrap_or(default_rating);
        b_elo.cmp(&a_elo).then_with(|| a_id.cmp(b_id))
    });

    let players: Vec<LadderListItem> = players
        .into_iter()
        .enumerate()
        .map(|(i, (id, player))| {
            let elo = player.elo_rating.unwrap_or(default_rating);
            LadderListItem {
                rank: i + 1,
                player_id: id,
                username: player.username,
                elo_rating: elo,
                position: player.position,
                active: player.active,
                rank_name: Rank::for_rating(elo).to_string(),
            }
        })
        .collect();

    Json(LadderResponse {
        division: division.key.to_string(),
        players,
    })
    .into_response()
}

pub async fn get_members(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let members = match state.members.list().await {
        Ok(members) => members,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {e}"))
                .into_response()
        }
    };

    let items: Vec<MemberListItem> = members
        .into_iter()
        .map(|(id, member)| MemberListItem {
            user_id: id,
            username: member.username,
            ladders: member.ladders,
            primary_ladder: member.primary_ladder,
            highest_elo: member.highest_elo,
            rank: member.rank.to_string(),
            is_non_participant: member.is_non_participant,
            last_updated: member.last_updated.to_rfc3339(),
        })
        .collect();

    Json(items).into_response()
}
