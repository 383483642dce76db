//! # PWA 图标生成工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            调用方（CLI / 文件选择 / 拖放 / 粘贴）          │
//! │      提供 ImageSource 列表 + BackgroundConfig + 尺寸       │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ icon ─────── 加载·解码·光栅化·打包                    │
//! │  │   ├─ rasterizer   contain 适配 + 背景填充             │
//! │  │   ├─ packager     渲染计划 + 并发渲染 + 归档           │
//! │  │   └─ favicon      16/32/48 → favicon.ico             │
//! │  │                                                       │
//! │  └─ settings ─── 持久化设置（固定键，损坏即回退默认）      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`icon`] | 源图加载、图标光栅化、PNG 编码、zip 打包、favicon、预览 |
//! | [`settings`] | 背景色 / 透明 / 自定义尺寸 / iOS 白底开关的持久化 |

pub mod error;
pub mod icon;
pub mod settings;
